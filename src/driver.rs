//! Abstract database driver boundary
//!
//! The session manager talks to the database through these traits, so
//! tests can substitute a programmable fake for a real driver and the
//! lifecycle contracts hold regardless of which backend implements
//! them.

use crate::config::ConnectionConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

/// A decoded result row keyed by column name
///
/// JSON is the interchange shape so callers can deserialize rows into
/// their own record types with `serde`.
pub type Row = serde_json::Map<String, Value>;

/// An owned bind parameter passed through to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i16> for SqlParam {
    fn from(value: i16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for SqlParam {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Failure surfaced by the underlying database driver
///
/// Carries the backend's error untouched as `source`; `Display` is the
/// backend's own message so nothing gets wrapped or rephrased on the
/// way to the caller.
#[derive(Debug)]
pub struct DriverError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DriverError {
    /// Create an error from a message alone
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error carrying the underlying driver failure
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: Box<dyn StdError + Send + Sync>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }

    /// The underlying driver message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for DriverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// Factory for live database sessions
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a session using the supplied configuration
    async fn open(&self, config: &ConnectionConfig) -> Result<Box<dyn DriverHandle>, DriverError>;
}

/// A live database session owned by the manager
#[async_trait]
pub trait DriverHandle: Send + Sync {
    /// Execute a statement with bound parameters and return all rows
    async fn query(&self, statement: &str, params: &[SqlParam]) -> Result<Vec<Row>, DriverError>;

    /// Tear the session down
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}
