use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuestionType {
    #[default]
    Choice,
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct QuestionOption {
    pub body: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// A quiz question. Options are kept in presentation order, and answers
/// reference them by their zero-based position in `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Question {
    pub id: i32,
    pub unit_id: i32,
    #[serde(rename = "type")]
    pub type_: QuestionType,
    pub body: String,
    pub options: Vec<QuestionOption>,
    #[serde(rename = "expectedAnswer", skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub exp: i32,
}

#[derive(Debug, Default)]
pub struct Query {
    pub id_in: Option<Vec<i32>>,
}
