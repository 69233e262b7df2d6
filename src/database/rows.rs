use crate::core::models::{
    answer::Answer,
    question::{QuestionOption, QuestionType},
    user::{Credential, User},
};
use crate::error::Error;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub dni: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = Error;
    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            dni: row.dni,
            name: row.name,
            lastname: row.lastname,
            email: row.email,
            role: row.role.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct CredentialRow {
    pub password: String,
    pub salt: String,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Credential {
            password: row.password,
            salt: row.salt,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub unit_id: i32,
    pub type_: String,
    pub body: String,
    pub expected_answer: Option<String>,
    pub exp: i32,
}

impl QuestionRow {
    pub fn question_type(&self) -> QuestionType {
        match self.type_.as_str() {
            "Open" => QuestionType::Open,
            _ => QuestionType::Choice,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct OptionRow {
    pub question_id: i32,
    pub body: String,
    pub is_correct: bool,
}

impl From<OptionRow> for QuestionOption {
    fn from(row: OptionRow) -> Self {
        QuestionOption {
            body: row.body,
            is_correct: row.is_correct,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct AnswerRow {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub selected_option: Option<String>,
    pub body: Option<String>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            id: row.id,
            user_id: row.user_id,
            question_id: row.question_id,
            selected_option: row.selected_option,
            body: row.body,
        }
    }
}
