use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::AuthMode;
use crate::error::AppError;

/// Requires a bearer token when the API runs in JWT mode.
///
/// Attach it to the routes it protects (`#[get("", wrap = "AuthMiddleware")]`) so it runs after
/// the router has matched the request. The mode comes from the `web::Data<AuthMode>` registered
/// on the App; in `AuthMode::Open` every request passes through untouched.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(mode) = req.app_data::<web::Data<AuthMode>>().cloned() else {
            let err = AppError::InternalServerError("Auth mode not configured".into());
            return Box::pin(async move { Err(err.into()) });
        };
        let Some(tokens) = mode.tokens() else {
            return Box::pin(self.service.call(req));
        };

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let claims = match bearer {
            Some(token) => tokens.verify(token),
            None => Err(AppError::Unauthorized("Missing token".into())),
        };

        match claims {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => {
                log::warn!("Rejected request to {}: {}", req.path(), app_err);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
