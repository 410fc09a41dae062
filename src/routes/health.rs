use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::store::Store;

/// Health check endpoint
///
/// Reports that the server is up, which storage backend it runs on, and the current time.
#[get("/health")]
pub async fn health(store: web::Data<dyn Store>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "storage": store.backend(),
        "timestamp": Utc::now()
    }))
}
