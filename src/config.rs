use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error occurred while reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error occurred
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Required environment variable is not set
    #[error("environment variable {name} is not set")]
    MissingVar {
        /// Name of the missing variable
        name: &'static str,
    },
}

/// Database connection configuration
///
/// Immutable once supplied to a manager. All four fields must be
/// populated before a connect attempt succeeds; see [`Self::validate`].
#[derive(Deserialize, Serialize, Clone)]
pub struct ConnectionConfig {
    /// Database host
    pub host: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Database name
    pub database: String,
}

impl ConnectionConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `DB_HOST`, `DB_USER`, `DB_PASSWORD` and
    /// `DB_DATABASE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require_var("DB_HOST")?,
            user: require_var("DB_USER")?,
            password: require_var("DB_PASSWORD")?,
            database: require_var("DB_DATABASE")?,
        })
    }

    /// Check that every connection field is populated
    ///
    /// Returns the first empty field as a
    /// [`SessionError::Configuration`].
    pub fn validate(&self) -> Result<(), SessionError> {
        let fields = [
            ("host", &self.host),
            ("user", &self.user),
            ("password", &self.password),
            ("database", &self.database),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(SessionError::Configuration { field });
            }
        }
        Ok(())
    }
}

// Debug must never leak the password into logs or panics.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar { name })
}
