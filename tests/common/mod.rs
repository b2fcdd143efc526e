/// Shared test doubles for dbsession integration tests
use async_trait::async_trait;
use dbsession::{ConnectionConfig, Driver, DriverError, DriverHandle, Logger, Row, SqlParam};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Logger that records every sink invocation for assertions
#[derive(Default)]
pub struct RecordingLogger {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[allow(dead_code)]
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Shared state behind a fake driver and the handles it produces
///
/// Failure switches can be flipped mid-test; live handles observe them
/// through the shared Arc.
#[derive(Default)]
pub struct FakeState {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub queries: AtomicUsize,
    pub fail_open: AtomicBool,
    pub fail_close: AtomicBool,
    pub fail_query: AtomicBool,
    pub rows: Mutex<Vec<Row>>,
}

/// Programmable in-memory driver
#[derive(Default, Clone)]
pub struct FakeDriver {
    pub state: Arc<FakeState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let driver = Self::default();
        *driver.state.rows.lock().unwrap() = rows;
        driver
    }

    #[allow(dead_code)]
    pub fn opens(&self) -> usize {
        self.state.opens.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn queries(&self) -> usize {
        self.state.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn open(&self, _config: &ConnectionConfig) -> Result<Box<dyn DriverHandle>, DriverError> {
        self.state.opens.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_open.load(Ordering::SeqCst) {
            return Err(DriverError::new("connection refused"));
        }
        Ok(Box::new(FakeHandle {
            state: Arc::clone(&self.state),
        }))
    }
}

pub struct FakeHandle {
    state: Arc<FakeState>,
}

#[async_trait]
impl DriverHandle for FakeHandle {
    async fn query(&self, _statement: &str, _params: &[SqlParam]) -> Result<Vec<Row>, DriverError> {
        self.state.queries.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_query.load(Ordering::SeqCst) {
            return Err(DriverError::new("syntax error at or near \"FRMO\""));
        }
        Ok(self.state.rows.lock().unwrap().clone())
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(DriverError::new("connection reset by peer"));
        }
        Ok(())
    }
}

/// A fully populated configuration for lifecycle tests
pub fn sample_config() -> ConnectionConfig {
    ConnectionConfig {
        host: "localhost".to_string(),
        user: "app".to_string(),
        password: "secret".to_string(),
        database: "appdb".to_string(),
    }
}

/// Build a [`Row`] from a `serde_json::json!` object literal
#[allow(dead_code)]
pub fn json_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
