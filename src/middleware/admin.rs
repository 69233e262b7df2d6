use crate::context::UserInfo;
use crate::core::models::user::Role;
use crate::core::ports::repository::{Manager, UserCommon};
use crate::error::Error;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web::Data,
    HttpMessage,
};
use std::future::Future;
use std::future::{ready, Ready};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Lets a request through only when the caller's account has the admin role.
/// Must be mounted inside [`super::jwt::JWTMiddleware`].
pub struct AdminGuard<M> {
    manager: Data<M>,
}

impl<M> AdminGuard<M> {
    pub fn new(manager: Data<M>) -> Self {
        Self { manager }
    }
}

impl<S, B, M> Transform<S, ServiceRequest> for AdminGuard<M>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    M: Manager + 'static,
{
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type Response = S::Response;
    type Error = S::Error;
    type InitError = ();
    type Transform = AdminGuardMiddleware<S, M>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardMiddleware {
            manager: self.manager.clone(),
            service,
        }))
    }
}

pub struct AdminGuardMiddleware<S, M> {
    manager: Data<M>,
    service: S,
}

impl<S, B, M> Service<ServiceRequest> for AdminGuardMiddleware<S, M>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    M: Manager + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<ServiceResponse<B>, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }
    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user_info = req.extensions().get::<UserInfo>().cloned();
        let Some(user_info) = user_info else {
            return Box::pin(async move { Err(Error::Unauthorized("unauthorized".into()).into()) });
        };
        let manager = self.manager.clone();
        let next = self.service.call(req);
        Box::pin(async move {
            require_admin(manager.get_ref(), &user_info.dni).await?;
            next.await
        })
    }
}

async fn require_admin<M>(manager: &M, dni: &str) -> Result<(), Error>
where
    M: Manager,
{
    let mut db = manager.db().await?;
    match UserCommon::get_by_dni(&mut db, dni).await? {
        Some(user) if user.role == Role::Admin => Ok(()),
        Some(_) => {
            log::warn!("{} tried to reach an administrator route", dni);
            Err(Error::Forbidden("administrator role required".into()))
        }
        None => Err(Error::Unauthorized("account no longer exists".into())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::memory::MemoryManager;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    async fn secret() -> HttpResponse {
        HttpResponse::Ok().body("secret")
    }

    async fn call_as(manager: MemoryManager, dni: Option<&str>) -> Result<StatusCode, StatusCode> {
        let dni = dni.map(String::from);
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminGuard::new(Data::new(manager)))
                    .wrap_fn(move |req, srv| {
                        if let Some(dni) = &dni {
                            req.extensions_mut().insert(UserInfo { dni: dni.clone() });
                        }
                        srv.call(req)
                    })
                    .route("", web::get().to(secret)),
            ),
        )
        .await;
        let req = test::TestRequest::get().uri("/admin").to_request();
        match test::try_call_service(&app, req).await {
            Ok(resp) => Ok(resp.status()),
            Err(e) => Err(e.as_response_error().status_code()),
        }
    }

    #[actix_web::test]
    async fn test_admin_guard() {
        let manager = MemoryManager::default();
        manager.seed_user("1", Role::Admin);
        manager.seed_user("2", Role::User);
        assert_eq!(call_as(manager.clone(), Some("1")).await, Ok(StatusCode::OK));
        assert_eq!(call_as(manager.clone(), Some("2")).await, Err(StatusCode::FORBIDDEN));
        assert_eq!(call_as(manager.clone(), Some("3")).await, Err(StatusCode::UNAUTHORIZED));
        assert_eq!(call_as(manager, None).await, Err(StatusCode::UNAUTHORIZED));
    }
}
