use crate::core::models::{
    answer::{Answer, Query as AnswerQuery},
    question::{Query as QuestionQuery, Question},
    user::{Profile, User, WithExp},
};
use crate::core::ports::repository::{AnswerCommon, QuestionCommon, Store, UserCommon};
use crate::core::services::evaluator::evaluate;
use crate::error::Error;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Correctly answered question ids, keyed by unit id.
pub type Progress = BTreeMap<i32, BTreeSet<i32>>;

pub fn index_questions(questions: Vec<Question>) -> HashMap<i32, Question> {
    questions.into_iter().map(|q| (q.id, q)).collect()
}

fn correct<'q>(questions: &'q HashMap<i32, Question>, answers: &'q [Answer]) -> impl Iterator<Item = &'q Question> {
    answers.iter().filter_map(move |a| questions.get(&a.question_id).filter(|q| evaluate(q, a)))
}

pub fn sum_experience(questions: &HashMap<i32, Question>, answers: &[Answer]) -> i64 {
    correct(questions, answers).map(|q| i64::from(q.exp.max(0))).sum()
}

pub fn group_by_unit(questions: &HashMap<i32, Question>, answers: &[Answer]) -> Progress {
    let mut progress = Progress::new();
    for q in correct(questions, answers) {
        progress.entry(q.unit_id).or_default().insert(q.id);
    }
    progress
}

/// Fetches a user's answers together with every question they reference, in
/// one query per collection.
pub async fn answers_with_questions<S>(store: &mut S, user_id: i32) -> Result<(Vec<Answer>, HashMap<i32, Question>), Error>
where
    S: Store,
{
    let answers = AnswerCommon::query(store, AnswerQuery { user_id_eq: Some(user_id) }).await?;
    let mut ids: Vec<i32> = answers.iter().map(|a| a.question_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok((answers, HashMap::new()));
    }
    let questions = QuestionCommon::query(store, QuestionQuery { id_in: Some(ids) }).await?;
    Ok((answers, index_questions(questions)))
}

pub async fn total_experience<S>(store: &mut S, user_id: i32) -> Result<i64, Error>
where
    S: Store,
{
    let (answers, questions) = answers_with_questions(store, user_id).await?;
    Ok(sum_experience(&questions, &answers))
}

pub async fn progress_by_unit<S>(store: &mut S, user_id: i32) -> Result<Progress, Error>
where
    S: Store,
{
    let (answers, questions) = answers_with_questions(store, user_id).await?;
    Ok(group_by_unit(&questions, &answers))
}

pub async fn user_by_dni<S>(store: &mut S, dni: &str) -> Result<User, Error>
where
    S: Store,
{
    UserCommon::get_by_dni(store, dni).await?.ok_or_else(|| Error::NotFound("user not found".into()))
}

pub async fn profile<S>(store: &mut S, dni: &str) -> Result<Profile, Error>
where
    S: Store,
{
    let user = user_by_dni(store, dni).await?;
    let exp = total_experience(store, user.id).await?;
    Ok(Profile {
        dni: user.dni,
        name: user.name,
        lastname: user.lastname,
        email: user.email,
        role: user.role,
        exp,
    })
}

/// Every account with its accumulated experience, highest first.
pub async fn leaderboard<S>(store: &mut S) -> Result<Vec<WithExp>, Error>
where
    S: Store,
{
    let users = UserCommon::query(store).await?;
    let questions = index_questions(QuestionCommon::query(store, QuestionQuery::default()).await?);
    let mut answers_by_user: HashMap<i32, Vec<Answer>> = HashMap::new();
    for a in AnswerCommon::query(store, AnswerQuery::default()).await? {
        answers_by_user.entry(a.user_id).or_default().push(a);
    }
    let mut list: Vec<WithExp> = users
        .into_iter()
        .map(|user| {
            let exp = answers_by_user.get(&user.id).map(|answers| sum_experience(&questions, answers)).unwrap_or(0);
            WithExp { user, exp }
        })
        .collect();
    list.sort_by(|a, b| b.exp.cmp(&a.exp).then_with(|| a.user.dni.cmp(&b.user.dni)));
    Ok(list)
}
