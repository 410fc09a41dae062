use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// A registered account. The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Email and password as submitted to both signup and login.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    #[validate(
        email(message = "email must be a valid email"),
        custom = "validate_email_domain"
    )]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters long"))]
    pub password: String,
}

/// Domains need a top-level part, so `user@localhost` is refused.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("");
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        let mut error = ValidationError::new("email");
        error.message = Some(Cow::from("email must be a valid email"));
        return Err(error);
    }
    Ok(())
}

/// The public view of a user returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_credentials_validation() {
        let input = Credentials {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(input.validate().is_ok());

        let input = Credentials {
            email: "invalid-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(input.validate().is_err());

        // Exactly six characters is the minimum.
        let input = Credentials {
            email: "test@example.com".to_string(),
            password: "sixsix".to_string(),
        };
        assert!(input.validate().is_ok());

        let input = Credentials {
            email: "test@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_email_needs_a_dotted_domain() {
        for email in ["user@localhost", "user@example.", "user@.com"] {
            let input = Credentials {
                email: email.to_string(),
                password: "password123".to_string(),
            };
            assert!(input.validate().is_err(), "{} should be rejected", email);
        }

        let input = Credentials {
            email: "user@mail.example.co".to_string(),
            password: "password123".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_credentials_reject_unknown_keys() {
        let parsed = serde_json::from_value::<Credentials>(serde_json::json!({
            "email": "a@example.com",
            "password": "secret1",
            "role": "admin"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new("a@example.com".into(), "$2b$10$abcdef".into());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
    }
}
