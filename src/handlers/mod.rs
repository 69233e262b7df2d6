pub mod profile;
pub mod user;

use crate::core::models::user::Registration;
use crate::core::ports::repository::Manager;
use crate::core::services::account;
use crate::core::services::outbox::Outbox;
use crate::error::Error;
use crate::impls::hasher::sha256::Sha256Hasher;
use crate::impls::tokener::jwt::JWT;
use crate::response::{Message, Token};
use crate::routes::TokenTtl;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Login {
    #[serde(rename = "DNI", default)]
    pub dni: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login<M>(Json(Login { dni, password }): Json<Login>, manager: Data<M>, hasher: Data<Sha256Hasher>, tokener: Data<JWT>, ttl: Data<TokenTtl>) -> Result<Json<Token>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let access_token = account::authenticate(&mut db, hasher.get_ref(), tokener.get_ref(), dni.trim(), &password, ttl.0).await?;
    Ok(Json(Token { access_token }))
}

pub async fn register<M>(Json(registration): Json<Registration>, manager: Data<M>, hasher: Data<Sha256Hasher>, outbox: Data<Outbox>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    account::register(&mut db, hasher.get_ref(), &outbox, registration).await?;
    Ok(HttpResponse::Created().json(Message::new("user registered, the password was sent by email")))
}
