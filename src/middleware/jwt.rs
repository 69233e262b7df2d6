use crate::context::UserInfo;
use crate::core::models::claim::Claim;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error as ServiceError;
use crate::impls::tokener::jwt::JWT;
use actix_web::{
    dev::{Service, ServiceRequest, Transform},
    http::header,
    Error, HttpMessage,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Verifies the bearer token and stores the caller's DNI as [`UserInfo`].
pub struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(JWTService {
                tokener: JWT::new(secret),
                next_service: service,
            })
        })
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

fn bearer(req: &ServiceRequest) -> Result<String, ServiceError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::Unauthorized("no token in header".into()))?
        .to_str()
        .map_err(|_| ServiceError::Unauthorized("malformed authorization header".into()))?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(ServiceError::Unauthorized("no token in header".into()));
    }
    Ok(token.to_owned())
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claim = bearer(&req).and_then(|token| {
            <JWT as Tokener<Claim>>::verify_token(&self.tokener, &token).map_err(|e| {
                log::debug!("rejected token: {}", e);
                ServiceError::Unauthorized("invalid token".into())
            })
        });
        match claim {
            Err(e) => return Box::pin(async move { Err(e.into()) }),
            Ok(claim) => {
                req.extensions_mut().insert(UserInfo { dni: claim.user().to_owned() });
            }
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}
