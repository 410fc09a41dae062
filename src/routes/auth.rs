use crate::{
    auth::{hash_password, verify_password, AuthMode, LoginResponse, SignupResponse},
    error::AppError,
    models::Credentials,
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Validates the credentials, rejects an email that is already registered and stores the
/// user with a bcrypt hash of the password.
///
/// ## Responses:
/// - `201 Created`: `{"message": "User registered successfully"}`.
/// - `400 Bad Request`: invalid email/password, or the email is already in use.
#[post("/signup")]
pub async fn signup(
    store: web::Data<dyn Store>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;
    let Credentials { email, password } = credentials.into_inner();

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("Email already in use".into()));
    }

    let password_hash = web::block(move || hash_password(&password)).await??;
    let user = store.create_user(&email, &password_hash).await?;
    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User registered successfully".into(),
    }))
}

/// Login user
///
/// Checks the credentials against the stored hash. In JWT mode the response also carries a
/// bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"message", "user": {"id", "email"}, "token"?}`.
/// - `400 Bad Request`: invalid input or wrong password.
/// - `404 Not Found`: no user with that email.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    auth: web::Data<AuthMode>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;
    let Credentials { email, password } = credentials.into_inner();

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let stored_hash = user.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &stored_hash)).await??;
    if !matches {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let token = auth.tokens().map(|tokens| tokens.issue(&user)).transpose()?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".into(),
        user: user.summary(),
        token,
    }))
}
