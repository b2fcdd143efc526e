//! `tokio-postgres` implementation of the driver boundary
//!
//! Opens a single plaintext connection per [`Driver::open`] call. The
//! connection future is spawned onto the runtime and joined again when
//! the handle is closed, so a connection that died mid-session surfaces
//! its error at teardown.

use crate::config::ConnectionConfig;
use crate::driver::{Driver, DriverError, DriverHandle, Row, SqlParam};
use async_trait::async_trait;
use bytes::BytesMut;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use tokio_postgres::{Column, NoTls};
use tracing::debug;

impl From<tokio_postgres::Error> for DriverError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::with_source(err.to_string(), Box::new(err))
    }
}

/// Driver that opens plaintext `tokio-postgres` connections
#[derive(Debug, Default, Clone, Copy)]
pub struct PgDriver;

#[async_trait]
impl Driver for PgDriver {
    async fn open(&self, config: &ConnectionConfig) -> Result<Box<dyn DriverHandle>, DriverError> {
        debug!(
            host = %config.host,
            user = %config.user,
            database = %config.database,
            "opening postgres connection"
        );

        let (client, connection) =
            tokio_postgres::connect(&connection_params(config), NoTls).await?;

        // The connection future drives the socket until the client is
        // dropped; it is joined in close().
        let connection_task = tokio::spawn(connection);

        Ok(Box::new(PgHandle {
            client,
            connection_task,
        }))
    }
}

/// Live `tokio-postgres` session
pub struct PgHandle {
    client: tokio_postgres::Client,
    connection_task: JoinHandle<Result<(), tokio_postgres::Error>>,
}

#[async_trait]
impl DriverHandle for PgHandle {
    async fn query(&self, statement: &str, params: &[SqlParam]) -> Result<Vec<Row>, DriverError> {
        let bound: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect();
        let rows = self.client.query(statement, &bound).await?;
        rows.iter().map(row_to_json).collect()
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        let Self {
            client,
            connection_task,
        } = *self;

        // Dropping the client closes the socket and lets the spawned
        // connection future run to completion.
        drop(client);
        match connection_task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.into()),
            Err(join_err) => Err(DriverError::new(format!(
                "connection task failed: {join_err}"
            ))),
        }
    }
}

// Keyword/value form understood by tokio-postgres. The password is
// never logged; it only appears here.
fn connection_params(config: &ConnectionConfig) -> String {
    format!(
        "host={} user={} password={} dbname={}",
        config.host, config.user, config.password, config.database
    )
}

impl ToSql for SqlParam {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(value) => value.to_sql(ty, out),
            // Integers are widened in the enum; narrow back to the
            // placeholder's wire width.
            Self::Int(value) if *ty == Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
            Self::Int(value) if *ty == Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
            Self::Int(value) => value.to_sql(ty, out),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(value) if *ty == Type::FLOAT4 => (*value as f32).to_sql(ty, out),
            Self::Float(value) => value.to_sql(ty, out),
            Self::Text(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        [
            Type::BOOL,
            Type::INT2,
            Type::INT4,
            Type::INT8,
            Type::FLOAT4,
            Type::FLOAT8,
            Type::TEXT,
            Type::VARCHAR,
            Type::BPCHAR,
            Type::NAME,
        ]
        .contains(ty)
    }

    to_sql_checked!();
}

fn row_to_json(row: &tokio_postgres::Row) -> Result<Row, DriverError> {
    let mut decoded = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        decoded.insert(column.name().to_string(), decode_column(row, idx, column)?);
    }
    Ok(decoded)
}

fn decode_column(
    row: &tokio_postgres::Row,
    idx: usize,
    column: &Column,
) -> Result<Value, DriverError> {
    let ty = column.type_();
    let value = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)?.map_or(Value::Null, Value::Bool)
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)?.map_or(Value::Null, Value::from)
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)?.map_or(Value::Null, Value::from)
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)?.map_or(Value::Null, Value::from)
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)?
            .map_or(Value::Null, |v| Value::from(f64::from(v)))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)?.map_or(Value::Null, Value::from)
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        row.try_get::<_, Option<String>>(idx)?.map_or(Value::Null, Value::String)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        row.try_get::<_, Option<Value>>(idx)?.unwrap_or(Value::Null)
    } else {
        return Err(DriverError::new(format!(
            "unsupported column type {ty} for column \"{}\"",
            column.name()
        )));
    };
    Ok(value)
}
