use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{FormInput, FormPage, ListQuery},
    store::Store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Lists forms one page at a time.
///
/// ## Query Parameters:
/// - `page` (optional, default 1): 1-based page number.
/// - `limit` (optional, default 10, max 100): forms per page.
///
/// Forms are returned in creation order, skipping `(page - 1) * limit`.
///
/// ## Responses:
/// - `200 OK`: `{"total", "page", "limit", "forms": [...]}`.
/// - `400 Bad Request`: `page` or `limit` out of range or not a number.
/// - `401 Unauthorized`: JWT mode only, when the bearer token is missing, invalid or expired.
#[get("", wrap = "AuthMiddleware")]
pub async fn list_forms(
    store: web::Data<dyn Store>,
    query: web::Query<ListQuery>,
    user: Option<AuthenticatedUser>,
) -> Result<impl Responder, AppError> {
    query.validate()?;
    let pagination = query.pagination();

    if let Some(AuthenticatedUser(claims)) = &user {
        log::debug!("Listing forms for {}", claims.email);
    }

    let forms = store
        .list_forms(pagination.skip(), pagination.limit())
        .await?;
    let total = store.count_forms().await?;

    Ok(HttpResponse::Ok().json(FormPage {
        total,
        page: pagination.page,
        limit: pagination.limit,
        forms,
    }))
}

/// Creates a new form.
///
/// ## Request Body:
/// - `title`: required, non-empty.
/// - `headerImage` (optional): URL of a header image.
/// - `questions`: non-empty array of `{questionText, type, options?, questionImage?}`.
///
/// ## Responses:
/// - `201 Created`: the stored form, including its generated `id` and `createdAt`.
/// - `400 Bad Request`: the body does not match the form schema.
#[post("")]
pub async fn create_form(
    store: web::Data<dyn Store>,
    form_data: web::Json<FormInput>,
) -> Result<impl Responder, AppError> {
    form_data.validate()?;

    let form = store.insert_form(form_data.into_inner()).await?;
    log::info!(
        "Created form {} with {} questions",
        form.id,
        form.questions.len()
    );

    Ok(HttpResponse::Created().json(form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthMode;
    use crate::store::MemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_create_form_rejects_empty_questions() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .service(web::scope("/forms").service(create_form)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/forms")
            .set_json(json!({ "title": "Empty", "questions": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_list_forms_empty_store() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .app_data(web::Data::new(AuthMode::Open))
                .service(web::scope("/forms").service(list_forms)),
        )
        .await;

        let req = test::TestRequest::get().uri("/forms").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({ "total": 0, "page": 1, "limit": 10, "forms": [] })
        );
    }
}
