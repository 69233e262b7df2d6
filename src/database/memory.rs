use crate::core::models::{
    answer::{Answer, Query as AnswerQuery},
    question::{Query as QuestionQuery, Question},
    user::{Credential, Insert as UserInsert, Patch as UserPatch, Role, User},
};
use crate::core::ports::hasher::PasswordHasher;
use crate::core::ports::repository::{AnswerCommon, Common, Manager, QuestionCommon, Store, TxStore, UserCommon};
use crate::error::Error;
use crate::impls::hasher::sha256::Sha256Hasher;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Account {
    user: User,
    credential: Credential,
}

#[derive(Debug, Clone, Default)]
struct State {
    accounts: Vec<Account>,
    questions: BTreeMap<i32, Question>,
    answers: Vec<Answer>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn account(&mut self, id: i32) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.user.id == id)
    }

    fn dni_taken(&self, dni: &str, except: Option<i32>) -> bool {
        self.accounts.iter().any(|a| a.user.dni == dni && Some(a.user.id) != except)
    }
}

/// Store kept in process memory. A store handed out by `tx()` works on a
/// snapshot that only becomes visible on `commit`.
pub struct MemoryStore {
    shared: Arc<Mutex<State>>,
    pending: Option<State>,
}

impl MemoryStore {
    fn with<R>(&mut self, f: impl FnOnce(&mut State) -> R) -> R {
        match &mut self.pending {
            Some(state) => f(state),
            None => {
                let mut guard = self.shared.lock().unwrap();
                f(&mut *guard)
            }
        }
    }
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.dni_taken(&user.dni, None) {
                return Err(Error::Conflict(format!("user already exists(dni: {})", user.dni)));
            }
            let id = s.next_id();
            s.accounts.push(Account {
                user: User {
                    id,
                    dni: user.dni,
                    name: user.name,
                    lastname: user.lastname,
                    email: user.email,
                    role: user.role,
                },
                credential: Credential {
                    password: user.password,
                    salt: user.salt,
                },
            });
            Ok(id)
        })
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.with(|s| s.account(id).map(|a| a.user.clone())))
    }

    async fn get_by_dni(&mut self, dni: &str) -> Result<Option<User>, Error> {
        Ok(self.with(|s| s.accounts.iter().find(|a| a.user.dni == dni).map(|a| a.user.clone())))
    }

    async fn exists(&mut self, dni: &str) -> Result<bool, Error> {
        Ok(self.with(|s| s.dni_taken(dni, None)))
    }

    async fn query(&mut self) -> Result<Vec<User>, Error> {
        Ok(self.with(|s| s.accounts.iter().map(|a| a.user.clone()).collect()))
    }

    async fn patch(&mut self, id: i32, patch: UserPatch) -> Result<(), Error> {
        self.with(|s| {
            if let Some(dni) = &patch.dni {
                if s.dni_taken(dni, Some(id)) {
                    return Err(Error::Conflict(format!("user already exists(dni: {})", dni)));
                }
            }
            let account = s.account(id).ok_or_else(|| Error::NotFound("user not found".into()))?;
            if let Some(v) = patch.dni {
                account.user.dni = v;
            }
            if let Some(v) = patch.name {
                account.user.name = v;
            }
            if let Some(v) = patch.lastname {
                account.user.lastname = v;
            }
            if let Some(v) = patch.email {
                account.user.email = v;
            }
            if let Some(v) = patch.role {
                account.user.role = v;
            }
            if let Some(v) = patch.password {
                account.credential.password = v;
            }
            if let Some(v) = patch.salt {
                account.credential.salt = v;
            }
            Ok(())
        })
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.with(|s| {
            let before = s.accounts.len();
            s.accounts.retain(|a| a.user.id != id);
            s.accounts.len() != before
        }))
    }

    async fn credential(&mut self, id: i32) -> Result<Option<Credential>, Error> {
        Ok(self.with(|s| s.account(id).map(|a| a.credential.clone())))
    }

    async fn credential_by_dni(&mut self, dni: &str) -> Result<Option<Credential>, Error> {
        Ok(self.with(|s| s.accounts.iter().find(|a| a.user.dni == dni).map(|a| a.credential.clone())))
    }
}

impl QuestionCommon for MemoryStore {
    async fn query(&mut self, query: QuestionQuery) -> Result<Vec<Question>, Error> {
        Ok(self.with(|s| {
            s.questions
                .values()
                .filter(|q| query.id_in.as_ref().map(|ids| ids.contains(&q.id)).unwrap_or(true))
                .cloned()
                .collect()
        }))
    }
}

impl AnswerCommon for MemoryStore {
    async fn query(&mut self, query: AnswerQuery) -> Result<Vec<Answer>, Error> {
        Ok(self.with(|s| s.answers.iter().filter(|a| query.user_id_eq.map(|uid| a.user_id == uid).unwrap_or(true)).cloned().collect()))
    }

    async fn delete(&mut self, query: AnswerQuery) -> Result<u64, Error> {
        Ok(self.with(|s| {
            let before = s.answers.len();
            s.answers.retain(|a| !query.user_id_eq.map(|uid| a.user_id == uid).unwrap_or(true));
            (before - s.answers.len()) as u64
        }))
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(state) = self.pending.take() {
            *self.shared.lock().unwrap() = state;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<MemoryStore, Error> {
        Ok(MemoryStore {
            shared: self.state.clone(),
            pending: None,
        })
    }

    async fn tx(&self) -> Result<MemoryStore, Error> {
        let snapshot = self.state.lock().unwrap().clone();
        Ok(MemoryStore {
            shared: self.state.clone(),
            pending: Some(snapshot),
        })
    }
}

impl MemoryManager {
    pub fn seed_account(&self, dni: &str, role: Role, password: &str) -> i32 {
        let hasher = Sha256Hasher;
        let salt = hasher.gen_salt();
        let mut s = self.state.lock().unwrap();
        let id = s.next_id();
        s.accounts.push(Account {
            user: User {
                id,
                dni: dni.into(),
                name: format!("name {}", dni),
                lastname: format!("lastname {}", dni),
                email: format!("{}@example.org", dni),
                role,
            },
            credential: Credential {
                password: hasher.hash(password, &salt),
                salt,
            },
        });
        id
    }

    pub fn seed_user(&self, dni: &str, role: Role) -> i32 {
        self.seed_account(dni, role, "password")
    }

    pub fn seed_question(&self, question: Question) {
        self.state.lock().unwrap().questions.insert(question.id, question);
    }

    pub fn seed_answer(&self, mut answer: Answer) -> i32 {
        let mut s = self.state.lock().unwrap();
        answer.id = s.next_id();
        let id = answer.id;
        s.answers.push(answer);
        id
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().unwrap().accounts.iter().map(|a| a.user.clone()).collect()
    }

    pub fn answers(&self) -> Vec<Answer> {
        self.state.lock().unwrap().answers.clone()
    }

    pub fn credential(&self, dni: &str) -> Option<Credential> {
        self.state.lock().unwrap().accounts.iter().find(|a| a.user.dni == dni).map(|a| a.credential.clone())
    }
}
