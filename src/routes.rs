use crate::core::ports::repository::Manager;
use crate::core::services::outbox::Outbox;
use crate::error::Error;
use crate::handlers;
use crate::impls::hasher::sha256::Sha256Hasher;
use crate::impls::tokener::jwt::JWT;
use crate::middleware::admin::AdminGuard;
use crate::middleware::jwt::JWTMiddleware;
use actix_web::web::{delete, get, post, put, resource, scope, Data, JsonConfig, QueryConfig, ServiceConfig};

#[derive(Debug, Clone, Copy)]
pub struct TokenTtl(pub chrono::Duration);

#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// Everything a worker needs to serve requests; cloned once per worker.
pub struct AppState<M> {
    pub manager: Data<M>,
    pub secret: Vec<u8>,
    pub hasher: Sha256Hasher,
    pub outbox: Outbox,
    pub token_ttl: chrono::Duration,
    pub upload_limit: usize,
}

impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            secret: self.secret.clone(),
            hasher: self.hasher,
            outbox: self.outbox.clone(),
            token_ttl: self.token_ttl,
            upload_limit: self.upload_limit,
        }
    }
}

impl<M> AppState<M>
where
    M: Manager + 'static,
{
    pub fn configure(self, cfg: &mut ServiceConfig) {
        cfg.app_data(JsonConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
            .app_data(QueryConfig::default().error_handler(|err, _| Error::Validation(err.to_string()).into()))
            .app_data(self.manager.clone())
            .app_data(Data::new(JWT::new(self.secret.clone())))
            .app_data(Data::new(self.hasher))
            .app_data(Data::new(self.outbox))
            .app_data(Data::new(TokenTtl(self.token_ttl)))
            .app_data(Data::new(UploadLimit(self.upload_limit)))
            .service(resource("/users").route(get().to(handlers::user::list::<M>)))
            .service(resource("/register").route(post().to(handlers::register::<M>)))
            .service(resource("/login").route(post().to(handlers::login::<M>)))
            .service(
                scope("")
                    .wrap(JWTMiddleware::new(self.secret))
                    .service(
                        resource("/profile")
                            .route(get().to(handlers::profile::detail::<M>))
                            .route(put().to(handlers::profile::update::<M>)),
                    )
                    .service(resource("/user-progress").route(get().to(handlers::profile::progress::<M>)))
                    .service(
                        scope("/users")
                            .wrap(AdminGuard::new(self.manager))
                            .route("/upload", post().to(handlers::user::upload::<M>))
                            .route("/export", get().to(handlers::user::export::<M>))
                            .route("/report", get().to(handlers::user::report::<M>))
                            .service(
                                resource("/{id}")
                                    .route(get().to(handlers::user::detail::<M>))
                                    .route(put().to(handlers::user::update::<M>))
                                    .route(delete().to(handlers::user::delete::<M>)),
                            ),
                    ),
            );
    }
}
