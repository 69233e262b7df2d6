use super::answer::Answer;
use super::question::Question;
use super::user::User;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnsweredQuestion {
    pub question: Option<Question>,
    pub answer: Answer,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
pub struct UserReport {
    pub user: User,
    pub questions_answered: Vec<AnsweredQuestion>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: u32,
    pub skipped: u32,
}
