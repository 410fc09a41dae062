pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::UserSummary;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// How the API authenticates callers.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// No tokens: login only confirms credentials and every route is public.
    Open,
    /// Login issues a bearer token and the form listing requires one.
    Jwt(TokenService),
}

impl AuthMode {
    pub fn from_config(config: &Config) -> Self {
        match &config.jwt {
            Some(settings) => AuthMode::Jwt(TokenService::from_settings(settings)),
            None => AuthMode::Open,
        }
    }

    pub fn tokens(&self) -> Option<&TokenService> {
        match self {
            AuthMode::Open => None,
            AuthMode::Jwt(tokens) => Some(tokens),
        }
    }
}

/// Response body for a successful signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
}

/// Response body for a successful login. `token` is only present in JWT mode.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtSettings;
    use uuid::Uuid;

    #[test]
    fn test_auth_mode_from_config() {
        let mut config = Config::from_lookup(|_| None).unwrap();
        assert!(AuthMode::from_config(&config).tokens().is_none());

        config.jwt = Some(JwtSettings {
            secret: "secret".into(),
            expiration_hours: 1,
        });
        assert!(AuthMode::from_config(&config).tokens().is_some());
    }

    #[test]
    fn test_login_response_omits_missing_token() {
        let response = LoginResponse {
            message: "Login successful".into(),
            user: UserSummary {
                id: Uuid::nil(),
                email: "a@example.com".into(),
            },
            token: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["user"]["email"], "a@example.com");
    }
}
