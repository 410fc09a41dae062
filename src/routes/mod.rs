pub mod auth;
pub mod forms;
pub mod health;

use actix_web::web;

use crate::error::AppError;

/// Registers the `/api` routes. Mount inside `web::scope("/api")`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(auth::signup)
        .service(auth::login)
        .service(
            web::scope("/forms")
                .service(forms::list_forms)
                .service(forms::create_form),
        );
}

/// Malformed or mistyped JSON bodies become `400` with the usual `{"error": ...}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
