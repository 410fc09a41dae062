use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{duplicate_email, Store};
use crate::error::AppError;
use crate::models::{Form, FormInput, User};

/// In-memory `Store` for tests and running without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    forms: Arc<RwLock<Vec<Form>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(duplicate_email());
        }
        let user = User::new(email.to_string(), password_hash.to_string());
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_form(&self, input: FormInput) -> Result<Form, AppError> {
        let form = Form::new(input);
        self.forms.write().await.push(form.clone());
        Ok(form)
    }

    async fn list_forms(&self, skip: i64, limit: i64) -> Result<Vec<Form>, AppError> {
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .forms
            .read()
            .await
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_forms(&self) -> Result<i64, AppError> {
        Ok(self.forms.read().await.len() as i64)
    }
}
