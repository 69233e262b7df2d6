use crate::core::models::{
    answer::{Answer, Query as AnswerQuery},
    question::{Query as QuestionQuery, Question, QuestionOption},
    user::{Credential, Insert as UserInsert, Patch as UserPatch, User},
};
use crate::core::ports::repository::{AnswerCommon, Common, Manager, QuestionCommon, Store, TxStore, UserCommon};
use crate::database::rows::{AnswerRow, CredentialRow, OptionRow, QuestionRow, UserRow};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;

const UNIQUE_VIOLATION: &str = "23505";

fn map_unique_violation(err: sqlx::Error, dni: &str) -> Error {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return Error::Conflict(format!("user already exists(dni: {})", dni));
        }
    }
    Error::Database(err)
}

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let dni = user.dni.clone();
        let id: i32 = query_scalar("INSERT INTO users (dni, name, lastname, email, password, salt, role) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id")
            .bind(user.dni)
            .bind(user.name)
            .bind(user.lastname)
            .bind(user.email)
            .bind(user.password)
            .bind(user.salt)
            .bind(user.role.as_str())
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| map_unique_violation(e, &dni))?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let row: Option<UserRow> = query_as("SELECT id, dni, name, lastname, email, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_by_dni(&mut self, dni: &str) -> Result<Option<User>, Error> {
        let row: Option<UserRow> = query_as("SELECT id, dni, name, lastname, email, role FROM users WHERE dni = $1")
            .bind(dni)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn exists(&mut self, dni: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM users WHERE dni = $1)")
            .bind(dni)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn query(&mut self) -> Result<Vec<User>, Error> {
        let rows: Vec<UserRow> = query_as("SELECT id, dni, name, lastname, email, role FROM users ORDER BY id")
            .fetch_all(&mut self.executor)
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error> {
        if patch.is_empty() {
            return Ok(());
        }
        let dni = patch.dni.clone().unwrap_or_default();
        let mut stmt = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = stmt.separated(", ");
        if let Some(v) = patch.dni {
            set.push("dni = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.name {
            set.push("name = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.lastname {
            set.push("lastname = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.email {
            set.push("email = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.role {
            set.push("role = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = patch.password {
            set.push("password = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.salt {
            set.push("salt = ").push_bind_unseparated(v);
        }
        stmt.push(" WHERE id = ").push_bind(id);
        let res = stmt.build().execute(&mut self.executor).await.map_err(|e| map_unique_violation(e, &dni))?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("user not found".into()));
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM users WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn credential(&mut self, id: i32) -> Result<Option<Credential>, Error> {
        let row: Option<CredentialRow> = query_as("SELECT password, salt FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row.map(Credential::from))
    }

    async fn credential_by_dni(&mut self, dni: &str) -> Result<Option<Credential>, Error> {
        let row: Option<CredentialRow> = query_as("SELECT password, salt FROM users WHERE dni = $1")
            .bind(dni)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row.map(Credential::from))
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, query: QuestionQuery) -> Result<Vec<Question>, Error> {
        let rows: Vec<QuestionRow> = query_as(
            "SELECT id, unit_id, type_, body, expected_answer, exp
            FROM questions
            WHERE ($1::INT4[] IS NULL OR id = ANY($1))
            ORDER BY id",
        )
        .bind(query.id_in)
        .fetch_all(&mut self.executor)
        .await?;
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let opts: Vec<OptionRow> = query_as(
            "SELECT question_id, body, is_correct
            FROM question_options
            WHERE question_id = ANY($1)
            ORDER BY question_id, position",
        )
        .bind(ids)
        .fetch_all(&mut self.executor)
        .await?;
        let mut options: HashMap<i32, Vec<QuestionOption>> = HashMap::new();
        for o in opts {
            options.entry(o.question_id).or_default().push(o.into());
        }
        Ok(rows
            .into_iter()
            .map(|r| Question {
                id: r.id,
                unit_id: r.unit_id,
                type_: r.question_type(),
                options: options.remove(&r.id).unwrap_or_default(),
                body: r.body,
                expected_answer: r.expected_answer,
                exp: r.exp,
            })
            .collect())
    }
}

impl<E> AnswerCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, query: AnswerQuery) -> Result<Vec<Answer>, Error> {
        let rows: Vec<AnswerRow> = query_as(
            "SELECT id, user_id, question_id, selected_option, body
            FROM answers
            WHERE ($1::INT4 IS NULL OR user_id = $1)
            ORDER BY id",
        )
        .bind(query.user_id_eq)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn delete(&mut self, query: AnswerQuery) -> Result<u64, Error> {
        let res = sqlx::query("DELETE FROM answers WHERE ($1::INT4 IS NULL OR user_id = $1)")
            .bind(query.user_id_eq)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Common for PgSqlx<Transaction<'static, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<Transaction<'static, Postgres>> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
