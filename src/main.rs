#![allow(async_fn_in_trait)]

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middleware;
mod response;
mod routes;

use crate::config::Config;
use crate::core::services::outbox::{self, Outbox};
use crate::database::sqlx::PgSqlxManager;
use crate::impls::hasher::sha256::Sha256Hasher;
use crate::impls::mailer::{http::HttpMailer, log_only::LogMailer};
use crate::routes::AppState;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let (outbox, receiver) = Outbox::channel();
    match config.mail.clone() {
        Some(mail) => {
            log::info!("delivering mail through {}", mail.api_url);
            actix_web::rt::spawn(outbox::run(HttpMailer::new(mail), receiver));
        }
        None => {
            log::warn!("MAIL_API_URL not set, outgoing mail will only be logged");
            actix_web::rt::spawn(outbox::run(LogMailer, receiver));
        }
    }

    let state = AppState {
        manager: Data::new(PgSqlxManager::new(pool)),
        secret: config.jwt_secret.clone().into_bytes(),
        hasher: Sha256Hasher,
        outbox,
        token_ttl: chrono::Duration::days(config.token_ttl_days),
        upload_limit: config.upload_limit,
    };
    log::info!("listening on {}:{}", config.bind_addr, config.port);
    HttpServer::new(move || {
        let state = state.clone();
        App::new().wrap(Logger::default()).configure(move |cfg| state.configure(cfg))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
