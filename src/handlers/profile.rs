use crate::context::UserInfo;
use crate::core::models::user::Profile;
use crate::core::ports::repository::Manager;
use crate::core::services::{account, experience};
use crate::core::services::outbox::Outbox;
use crate::error::Error;
use crate::impls::hasher::sha256::Sha256Hasher;
use crate::response::Message;
use actix_web::web::{Data, Json};
use serde::Deserialize;
use std::collections::BTreeMap;

pub async fn detail<M>(me: UserInfo, manager: Data<M>) -> Result<Json<Profile>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(experience::profile(&mut db, &me.dni).await?))
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    #[serde(rename = "currentPassword")]
    current_password: Option<String>,
    password: Option<String>,
}

pub async fn update<M>(me: UserInfo, Json(body): Json<PasswordChange>, manager: Data<M>, hasher: Data<Sha256Hasher>, outbox: Data<Outbox>) -> Result<Json<Message>, Error>
where
    M: Manager + 'static,
{
    let (Some(current), Some(password)) = (body.current_password, body.password) else {
        return Err(Error::Validation("currentPassword and password are required".into()));
    };
    let mut db = manager.db().await?;
    account::update_profile(&mut db, hasher.get_ref(), &outbox, &me.dni, &current, &password).await?;
    Ok(Json(Message::new("password updated")))
}

/// Unit id to the ids of the questions answered correctly in it, both as strings.
pub async fn progress<M>(me: UserInfo, manager: Data<M>) -> Result<Json<BTreeMap<String, Vec<String>>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let user = experience::user_by_dni(&mut db, &me.dni).await?;
    let progress = experience::progress_by_unit(&mut db, user.id).await?;
    Ok(Json(
        progress
            .into_iter()
            .map(|(unit, questions)| (unit.to_string(), questions.into_iter().map(|q| q.to_string()).collect()))
            .collect(),
    ))
}
