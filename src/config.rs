use std::{env, fmt, time::Duration};

/// Settings for issuing and verifying bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Settings for the per-client fixed-window rate limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

pub struct Config {
    /// Postgres connection string. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// `Some` switches the API into bearer-token mode.
    pub jwt: Option<JwtSettings>,
    pub rate_limit: Option<RateLimitSettings>,
}

/// A configuration variable was present but could not be used.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt = match lookup("JWT_SECRET") {
            Some(secret) if secret.trim().is_empty() => {
                return Err(ConfigError {
                    key: "JWT_SECRET",
                    reason: "must not be empty".into(),
                })
            }
            Some(secret) => Some(JwtSettings {
                secret,
                expiration_hours: parse_or(&lookup, "JWT_EXPIRATION_HOURS", 24)?,
            }),
            None => None,
        };

        let rate_limit = if parse_or(&lookup, "RATE_LIMIT_ENABLED", false)? {
            let defaults = RateLimitSettings::default();
            Some(RateLimitSettings {
                max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?,
                window: Duration::from_secs(parse_or(
                    &lookup,
                    "RATE_LIMIT_WINDOW_SECS",
                    defaults.window.as_secs(),
                )?),
            })
        } else {
            None
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_port: parse_or(&lookup, "SERVER_PORT", 5000)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt,
            rate_limit,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
