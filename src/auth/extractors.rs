use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::AppError;

/// Extracts the verified token claims from request extensions.
///
/// `AuthMiddleware` inserts the claims after checking the bearer token. Handlers that serve
/// both auth modes take `Option<AuthenticatedUser>`, which is `None` in open mode.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedUser(claims))),
            None => {
                let err = AppError::Unauthorized("Missing token".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
