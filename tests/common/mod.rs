#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

use formforge::auth::{AuthMode, TokenService};
use formforge::rate_limit::{RateLimitMiddleware, RateLimiter};
use formforge::routes::{self, health};
use formforge::security;
use formforge::store::{MemoryStore, Store};

pub const JWT_SECRET: &str = "integration_test_secret";

pub fn memory_store() -> web::Data<dyn Store> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    web::Data::from(store)
}

pub fn jwt_mode() -> AuthMode {
    AuthMode::Jwt(TokenService::new(JWT_SECRET, Duration::hours(1)))
}

/// Builds the same App as `main.rs` on top of the given store.
pub async fn init_app(
    store: web::Data<dyn Store>,
    auth_mode: AuthMode,
    limiter: Option<RateLimiter>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(store)
            .app_data(web::Data::new(auth_mode))
            .wrap(RateLimitMiddleware::new(limiter))
            .wrap(security::security_headers())
            .wrap(security::cors())
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

/// Sends a request and returns the status together with the parsed JSON body
/// (`Value::Null` when the body is empty or not JSON).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    // Middleware errors (401, 429) come back as `Err`; render them like the server would.
    let resp = match app.call(req).await {
        Ok(resp) => resp,
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            return (status, serde_json::from_slice(&body).unwrap_or(Value::Null));
        }
    };
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub async fn signup<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

pub fn sample_form(title: &str) -> Value {
    json!({
        "title": title,
        "headerImage": "https://example.com/header.png",
        "questions": [
            {
                "questionText": "What is your name?",
                "type": "text"
            },
            {
                "questionText": "Pick a color",
                "type": "multiple-choice",
                "options": ["red", "green", "blue"],
                "questionImage": "https://example.com/colors.png"
            }
        ]
    })
}

pub async fn create_form<S, B>(app: &S, body: &Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/forms")
        .set_json(body)
        .to_request();
    send(app, req).await
}
