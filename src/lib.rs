//! `dbsession` - A minimal single-connection database session manager
//!
//! This library owns one logical database connection at a time:
//! idempotent connect, parameterized SELECT execution, and guaranteed
//! handle release on disconnect. The database driver and the log sink
//! are injected capabilities, so the lifecycle contracts are testable
//! with fakes.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Connection configuration and loading
pub mod config;
/// Abstract driver boundary
pub mod driver;
pub mod error;
pub mod logger;
pub mod observability;
/// `tokio-postgres` driver implementation
pub mod postgres;
pub mod session;

pub use config::{ConfigError, ConnectionConfig};
pub use driver::{Driver, DriverError, DriverHandle, Row, SqlParam};
pub use error::{Result, SessionError};
pub use logger::{Logger, TracingLogger};
pub use postgres::PgDriver;
pub use session::{ConnectionManager, ConnectionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
