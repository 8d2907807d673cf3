//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `DATABASE_PATH` | `march_mad_css.sqlite` |
//! | `PREDICTION_DEADLINE` | `2027-03-18T16:00:00Z` (RFC 3339) |
//! | `SESSION_KEY` | random per process (sessions do not survive restarts) |
//! | `COOKIE_SECURE` | `true` |
//! | `ADMIN_USERNAMES` | empty (comma-separated, case-insensitive) |

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Minimum session key length accepted by the cookie signer.
pub const MIN_SESSION_KEY_LEN: usize = 64;

const DEFAULT_DEADLINE: &str = "2027-03-18T16:00:00Z";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidDeadline(String),
    SessionKeyTooShort(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort(v) => write!(f, "PORT is not a valid port: {}", v),
            ConfigError::InvalidDeadline(v) => {
                write!(f, "PREDICTION_DEADLINE is not an RFC 3339 timestamp: {}", v)
            }
            ConfigError::SessionKeyTooShort(len) => write!(
                f,
                "SESSION_KEY must be at least {} bytes (got {})",
                MIN_SESSION_KEY_LEN, len
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Picks and locks are refused from this instant on.
    pub deadline: DateTime<Utc>,
    pub session_key: Option<Vec<u8>>,
    pub cookie_secure: bool,
    /// Lowercased; these users are admins from sign-up.
    pub admin_usernames: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::InvalidPort(p))?,
            None => 8080,
        };
        let deadline_raw = get("PREDICTION_DEADLINE").unwrap_or_else(|| DEFAULT_DEADLINE.to_string());
        let deadline = DateTime::parse_from_rfc3339(&deadline_raw)
            .map_err(|_| ConfigError::InvalidDeadline(deadline_raw.clone()))?
            .with_timezone(&Utc);
        let session_key = match get("SESSION_KEY") {
            Some(k) if k.len() < MIN_SESSION_KEY_LEN => {
                return Err(ConfigError::SessionKeyTooShort(k.len()))
            }
            Some(k) => Some(k.into_bytes()),
            None => None,
        };
        let cookie_secure = get("COOKIE_SECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);
        let admin_usernames = get("ADMIN_USERNAMES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("march_mad_css.sqlite")),
            deadline,
            session_key,
            cookie_secure,
            admin_usernames,
        })
    }

    pub fn is_admin_username(&self, username: &str) -> bool {
        let username = username.to_lowercase();
        self.admin_usernames.iter().any(|a| *a == username)
    }

    /// True while picks may still be changed.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.deadline
    }
}
