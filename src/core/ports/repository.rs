use crate::core::models::{
    answer::{Answer, Query as AnswerQuery},
    question::{Query as QuestionQuery, Question},
    user::{Credential, Insert as UserInsert, Patch as UserPatch, User},
};
use crate::error::Error;

/// Account persistence. Implementations must enforce DNI uniqueness themselves
/// and report a duplicate as `Error::Conflict` from `insert` and `patch`.
pub trait UserCommon {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_dni(&mut self, dni: &str) -> Result<Option<User>, Error>;
    async fn exists(&mut self, dni: &str) -> Result<bool, Error>;
    async fn query(&mut self) -> Result<Vec<User>, Error>;
    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
    async fn credential(&mut self, id: i32) -> Result<Option<Credential>, Error>;
    async fn credential_by_dni(&mut self, dni: &str) -> Result<Option<Credential>, Error>;
}

pub trait QuestionCommon {
    async fn query(&mut self, query: QuestionQuery) -> Result<Vec<Question>, Error>;
}

pub trait AnswerCommon {
    async fn query(&mut self, query: AnswerQuery) -> Result<Vec<Answer>, Error>;
    async fn delete(&mut self, query: AnswerQuery) -> Result<u64, Error>;
}

pub trait Common: UserCommon + QuestionCommon + AnswerCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
