use serde::Serialize;

/// A submitted response. Exactly one of `selected_option` and `body` is expected
/// to be present; anything else is evaluated as incorrect.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Answer {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    #[serde(rename = "selectedOption", skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Query {
    pub user_id_eq: Option<i32>,
}
