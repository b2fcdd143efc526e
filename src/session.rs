//! # Connection Lifecycle Management
//!
//! Owns a single logical database connection: connect once, run
//! parameterized read queries, tear down cleanly. The manager brokers
//! every call through an injected [`Driver`] and reports through an
//! injected [`Logger`], so both can be replaced by test doubles.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dbsession::{ConnectionConfig, ConnectionManager, PgDriver, TracingLogger};
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! # async fn example() -> dbsession::Result<()> {
//! let config = ConnectionConfig {
//!     host: "localhost".to_string(),
//!     user: "app".to_string(),
//!     password: "secret".to_string(),
//!     database: "appdb".to_string(),
//! };
//!
//! let mut manager = ConnectionManager::new(
//!     config,
//!     Arc::new(PgDriver),
//!     Arc::new(TracingLogger),
//! );
//! manager.connect().await?;
//! let users: Vec<User> = manager
//!     .select("SELECT id, name FROM users WHERE id = $1", &[1i64.into()])
//!     .await?;
//! manager.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ConnectionConfig;
use crate::driver::{Driver, DriverHandle, Row, SqlParam};
use crate::error::{Result, SessionError};
use crate::logger::Logger;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::mem;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Connection lifecycle state
///
/// The live handle exists only inside `Connected`, so a connected state
/// without a handle is unrepresentable. Handle presence is the sole
/// source of truth; there is no separate flag.
pub enum ConnectionState {
    /// No live connection
    Disconnected,
    /// Live driver session
    Connected(Box<dyn DriverHandle>),
}

impl ConnectionState {
    /// Whether a live handle is present
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected(_) => write!(f, "Connected"),
        }
    }
}

/// Single-connection session manager
///
/// Holds at most one live driver handle. Operations take `&mut self`:
/// the borrow checker supplies the serialization the contract assumes,
/// so there is no internal locking and at most one in-flight driver
/// call. No timeouts are applied; a hung driver call hangs the caller.
///
/// Every failure path emits exactly one line through the injected
/// logger's error sink and returns the original error unwrapped. The
/// only silently absorbed case is a redundant [`connect`] on an
/// already-connected manager.
///
/// [`connect`]: Self::connect
pub struct ConnectionManager {
    state: ConnectionState,
    config: ConnectionConfig,
    driver: Arc<dyn Driver>,
    logger: Arc<dyn Logger>,
}

impl ConnectionManager {
    /// Create a manager in the disconnected state
    #[must_use]
    pub fn new(
        config: ConnectionConfig,
        driver: Arc<dyn Driver>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            config,
            driver,
            logger,
        }
    }

    /// Whether the manager currently holds a live connection
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// The connection configuration this manager was built with
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Establish the connection
    ///
    /// Idempotent: calling while already connected is a successful
    /// no-op that never contacts the driver. The configuration is
    /// validated before any I/O; a driver failure leaves the manager
    /// disconnected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state.is_connected() {
            debug!("connect called while already connected, nothing to do");
            return Ok(());
        }

        if let Err(err) = self.config.validate() {
            self.logger
                .error(&format!("Failed to connect to database. Error: {err}"));
            return Err(err);
        }

        match self.driver.open(&self.config).await {
            Ok(handle) => {
                self.state = ConnectionState::Connected(handle);
                self.logger.info(&format!(
                    "Connected to database. Host: {} User: {} Database: {}",
                    self.config.host, self.config.user, self.config.database
                ));
                Ok(())
            }
            Err(err) => {
                self.logger
                    .error(&format!("Failed to connect to database. Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Tear the connection down
    ///
    /// The handle is taken out of the state slot before the driver's
    /// close call, so the manager observes `Disconnected` on every exit
    /// path and a subsequent [`connect`] is always permitted, even when
    /// the close itself fails.
    ///
    /// [`connect`]: Self::connect
    pub async fn disconnect(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, ConnectionState::Disconnected) {
            ConnectionState::Disconnected => {
                let err = SessionError::NotConnected {
                    operation: "disconnect",
                };
                self.logger.error(&format!(
                    "Failed to disconnect from the database. Error: {err}"
                ));
                Err(err)
            }
            ConnectionState::Connected(handle) => handle.close().await.map_err(|err| {
                self.logger.error(&format!(
                    "Failed to disconnect from the database. Error: {err}"
                ));
                err.into()
            }),
        }
    }

    /// Execute a read query and deserialize the rows into `T`
    ///
    /// The statement text passes through unvalidated; parameter binding
    /// is the driver's job. The full result set is materialized. A
    /// failed query leaves the manager connected.
    pub async fn select<T>(&mut self, statement: &str, params: &[SqlParam]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let rows = self.run_query(statement, params).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value(Value::Object(row)) {
                Ok(record) => records.push(record),
                Err(err) => {
                    self.logger
                        .error(&format!("Failed to execute the SELECT. Error: {err}"));
                    return Err(err.into());
                }
            }
        }
        Ok(records)
    }

    /// Check connectivity with a `SELECT 1` round trip
    pub async fn ping(&mut self) -> Result<()> {
        self.run_query("SELECT 1", &[]).await.map(|_| ())
    }

    /// Read a file's full contents as UTF-8 text
    ///
    /// Stateless passthrough, callable in any connection state.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| {
            self.logger.error(&format!(
                "Failed to read the file at path: \"{}\". Error: {source}",
                path.display()
            ));
            SessionError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    async fn run_query(&self, statement: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        let ConnectionState::Connected(handle) = &self.state else {
            let err = SessionError::NotConnected {
                operation: "run a query",
            };
            self.logger
                .error(&format!("Failed to execute the SELECT. Error: {err}"));
            return Err(err);
        };
        handle.query(statement, params).await.map_err(|err| {
            self.logger
                .error(&format!("Failed to execute the SELECT. Error: {err}"));
            err.into()
        })
    }
}
