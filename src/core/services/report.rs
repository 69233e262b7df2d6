use crate::core::models::report::{AnsweredQuestion, UserReport};
use crate::core::ports::repository::Store;
use crate::core::services::account::get_user;
use crate::core::services::evaluator::evaluate_opt;
use crate::core::services::experience::answers_with_questions;
use crate::error::Error;

/// Every answer a user submitted, paired with its question and verdict, in submission order.
pub async fn user_report<S>(store: &mut S, user_id: i32) -> Result<UserReport, Error>
where
    S: Store,
{
    let user = get_user(store, user_id).await?;
    let (answers, questions) = answers_with_questions(store, user.id).await?;
    let questions_answered = answers
        .into_iter()
        .map(|answer| {
            let question = questions.get(&answer.question_id).cloned();
            let correct = evaluate_opt(question.as_ref(), &answer);
            AnsweredQuestion { question, answer, correct }
        })
        .collect();
    Ok(UserReport { user, questions_answered })
}
