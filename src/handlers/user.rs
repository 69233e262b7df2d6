use crate::context::UserInfo;
use crate::core::models::report::{ImportSummary, UserReport};
use crate::core::models::user::{Fields, User, WithExp};
use crate::core::ports::repository::Manager;
use crate::core::services::outbox::Outbox;
use crate::core::services::{account, experience, import, report as user_report};
use crate::error::Error;
use crate::impls::hasher::sha256::Sha256Hasher;
use crate::response::{Deleted, Updated};
use crate::routes::UploadLimit;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;
use bytes::BytesMut;
use futures_util::TryStreamExt;
use serde::Deserialize;

fn parse_id(raw: &str) -> Result<i32, Error> {
    raw.trim().parse().map_err(|_| Error::Validation(format!("invalid user id: {}", raw)))
}

pub async fn list<M>(manager: Data<M>) -> Result<Json<Vec<WithExp>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(experience::leaderboard(&mut db).await?))
}

pub async fn detail<M>(id: Path<String>, manager: Data<M>) -> Result<Json<User>, Error>
where
    M: Manager + 'static,
{
    let id = parse_id(&id)?;
    let mut db = manager.db().await?;
    Ok(Json(account::get_user(&mut db, id).await?))
}

pub async fn update<M>(me: UserInfo, id: Path<String>, Json(fields): Json<Fields>, manager: Data<M>, hasher: Data<Sha256Hasher>) -> Result<Json<Updated>, Error>
where
    M: Manager + 'static,
{
    let id = parse_id(&id)?;
    let mut db = manager.db().await?;
    let changed = account::update_fields(&mut db, hasher.get_ref(), &me.dni, id, fields).await?;
    let message = if changed.is_empty() { "nothing to update" } else { "user updated" };
    Ok(Json(Updated {
        message: message.into(),
        changed,
    }))
}

pub async fn delete<M>(id: Path<String>, manager: Data<M>) -> Result<Json<Deleted>, Error>
where
    M: Manager + 'static,
{
    let id = parse_id(&id)?;
    let tx = manager.tx().await?;
    let answers_removed = account::delete_user(tx, id).await?;
    Ok(Json(Deleted {
        message: "user deleted".into(),
        answers_removed,
    }))
}

/// Accepts a multipart form whose `file` field holds the account sheet.
pub async fn upload<M>(mut payload: Multipart, manager: Data<M>, hasher: Data<Sha256Hasher>, outbox: Data<Outbox>, limit: Data<UploadLimit>) -> Result<Json<ImportSummary>, Error>
where
    M: Manager + 'static,
{
    let invalid = |e: actix_multipart::MultipartError| Error::Validation(format!("invalid upload: {}", e));
    let mut content: Option<BytesMut> = None;
    while let Some(mut field) = payload.try_next().await.map_err(invalid)? {
        if field.name() != "file" || content.is_some() {
            while field.try_next().await.map_err(invalid)?.is_some() {}
            continue;
        }
        let mut buf = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid)? {
            if buf.len() + chunk.len() > limit.0 {
                return Err(Error::Validation(format!("file exceeds {} bytes", limit.0)));
            }
            buf.extend_from_slice(&chunk);
        }
        content = Some(buf);
    }
    let content = content.ok_or_else(|| Error::Validation("no file field in upload".into()))?;
    let mut db = manager.db().await?;
    Ok(Json(import::bulk_import(&mut db, hasher.get_ref(), &outbox, &content).await?))
}

pub async fn export<M>(manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let data = import::export(&mut db).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, "attachment; filename=\"users.csv\""))
        .body(data))
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    user_id: String,
}

pub async fn report<M>(Query(ReportParams { user_id }): Query<ReportParams>, manager: Data<M>) -> Result<Json<UserReport>, Error>
where
    M: Manager + 'static,
{
    let id = parse_id(&user_id)?;
    let mut db = manager.db().await?;
    Ok(Json(user_report::user_report(&mut db, id).await?))
}
