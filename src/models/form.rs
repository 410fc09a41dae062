use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Page used when the client does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// A single prompt inside a form.
///
/// Questions have no identity of their own; they live and die with the form that holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Question {
    /// The prompt shown to the respondent.
    #[validate(length(min = 1, message = "questionText is required"))]
    pub question_text: String,
    /// Free-form type tag such as `"text"` or `"multiple-choice"`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub kind: String,
    /// Choices offered for choice-style questions. Empty for the rest.
    #[serde(default)]
    pub options: Vec<String>,
    /// Optional image shown next to the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "questionImage must be a valid uri"))]
    pub question_image: Option<String>,
}

/// Request body for creating a form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "headerImage must be a valid uri"))]
    pub header_image: Option<String>,
    #[validate(custom = "validate_questions")]
    pub questions: Vec<Question>,
}

/// A stored form as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// Creates a new `Form` from validated input, assigning a fresh id and creation time.
    pub fn new(input: FormInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            header_image: input.header_image,
            questions: input.questions,
            created_at: Utc::now(),
        }
    }
}

/// Query parameters accepted by the form listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Number of forms to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// One page of forms plus the total count across all pages.
#[derive(Debug, Serialize, Deserialize)]
pub struct FormPage {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub forms: Vec<Form>,
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        let mut error = ValidationError::new("length");
        error.message = Some(Cow::from("questions must contain at least 1 item"));
        return Err(error);
    }

    for (index, question) in questions.iter().enumerate() {
        if let Err(errors) = question.validate() {
            let mut error = ValidationError::new("question");
            error.message = Some(Cow::from(format!("questions[{}]: {}", index, errors)));
            return Err(error);
        }
    }

    Ok(())
}
