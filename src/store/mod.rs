//! Persistence for users and forms.
//!
//! Handlers only see the `Store` trait, shared as `web::Data<dyn Store>`. `PgStore` is the
//! production backend; `MemoryStore` backs tests and database-less local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Form, FormInput, User};

#[async_trait]
pub trait Store: Send + Sync {
    /// Short name of the backend, reported by the health check.
    fn backend(&self) -> &'static str;

    /// Saves a new user. Fails with `AppError::BadRequest` when the email is already taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Saves a new form, questions kept in submission order.
    async fn insert_form(&self, input: FormInput) -> Result<Form, AppError>;

    /// Forms in creation order, skipping `skip` and returning at most `limit`.
    async fn list_forms(&self, skip: i64, limit: i64) -> Result<Vec<Form>, AppError>;

    async fn count_forms(&self) -> Result<i64, AppError>;
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::BadRequest("Email already in use".into())
}
