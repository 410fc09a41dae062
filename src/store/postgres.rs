use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{Form, FormInput, Question, User};

/// `Store` backed by PostgreSQL. Questions are kept as one JSONB document per form.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct FormRow {
    id: Uuid,
    title: String,
    header_image: Option<String>,
    questions: Json<Vec<Question>>,
    created_at: DateTime<Utc>,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Form {
            id: row.id,
            title: row.title,
            header_image: row.header_image,
            questions: row.questions.0,
            created_at: row.created_at,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        // A concurrent signup for the same email surfaces as a unique violation, which
        // `From<sqlx::Error>` reports as "Email already in use".
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_form(&self, input: FormInput) -> Result<Form, AppError> {
        let form = Form::new(input);

        let row = sqlx::query_as::<_, FormRow>(
            "INSERT INTO forms (id, title, header_image, questions, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, header_image, questions, created_at",
        )
        .bind(form.id)
        .bind(&form.title)
        .bind(&form.header_image)
        .bind(Json(&form.questions))
        .bind(form.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_forms(&self, skip: i64, limit: i64) -> Result<Vec<Form>, AppError> {
        let rows = sqlx::query_as::<_, FormRow>(
            "SELECT id, title, header_image, questions, created_at
             FROM forms ORDER BY created_at, id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Form::from).collect())
    }

    async fn count_forms(&self) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Needs a running Postgres; run with `cargo test -- --ignored` and DATABASE_URL set.
    #[ignore]
    #[actix_rt::test]
    async fn test_round_trip_against_postgres() {
        dotenv::dotenv().ok();
        let store = PgStore::connect(&env::var("DATABASE_URL").expect("DATABASE_URL not set"))
            .await
            .unwrap();

        let email = format!("{}@example.com", Uuid::new_v4());
        let user = store.create_user(&email, "hash").await.unwrap();
        assert!(matches!(
            store.create_user(&email, "hash").await,
            Err(AppError::BadRequest(_))
        ));
        let found = store.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let before = store.count_forms().await.unwrap();
        let form = store
            .insert_form(FormInput {
                title: "Postgres form".into(),
                header_image: None,
                questions: vec![Question {
                    question_text: "Q1".into(),
                    kind: "text".into(),
                    options: vec![],
                    question_image: None,
                }],
            })
            .await
            .unwrap();
        assert_eq!(store.count_forms().await.unwrap(), before + 1);
        assert_eq!(form.questions[0].question_text, "Q1");

        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(&email)
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(form.id)
            .execute(store.pool())
            .await
            .unwrap();
    }
}
