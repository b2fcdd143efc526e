//! Configuration loading and validation tests

use dbsession::{ConfigError, ConnectionConfig, SessionError};
use std::io::Write;

fn sample_config() -> ConnectionConfig {
    ConnectionConfig {
        host: "localhost".to_string(),
        user: "app".to_string(),
        password: "secret".to_string(),
        database: "appdb".to_string(),
    }
}

#[test]
fn test_from_file_parses_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
host = "db.internal"
user = "app"
password = "secret"
database = "appdb"
"#
    )
    .unwrap();

    let config = ConnectionConfig::from_file(file.path()).unwrap();
    assert_eq!(config.host, "db.internal");
    assert_eq!(config.user, "app");
    assert_eq!(config.password, "secret");
    assert_eq!(config.database, "appdb");
}

#[test]
fn test_from_file_missing_file_is_io_error() {
    let result = ConnectionConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_from_file_rejects_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "host = ").unwrap();

    let result = ConnectionConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_from_env_reads_all_four_variables() {
    std::env::set_var("DB_HOST", "db.internal");
    std::env::set_var("DB_USER", "app");
    std::env::set_var("DB_PASSWORD", "secret");
    std::env::set_var("DB_DATABASE", "appdb");

    let config = ConnectionConfig::from_env().unwrap();
    assert_eq!(config.host, "db.internal");
    assert_eq!(config.database, "appdb");

    std::env::remove_var("DB_DATABASE");
    let result = ConnectionConfig::from_env();
    assert!(
        matches!(result, Err(ConfigError::MissingVar { name }) if name == "DB_DATABASE"),
        "expected MissingVar for DB_DATABASE"
    );

    std::env::remove_var("DB_HOST");
    std::env::remove_var("DB_USER");
    std::env::remove_var("DB_PASSWORD");
}

#[test]
fn test_validate_accepts_populated_config() {
    assert!(sample_config().validate().is_ok());
}

#[test]
fn test_validate_reports_first_empty_field() {
    let mut config = sample_config();
    config.user.clear();

    let err = config.validate().unwrap_err();
    assert!(matches!(err, SessionError::Configuration { field: "user" }));
    assert_eq!(err.to_string(), "missing required connection field: user");
}

#[test]
fn test_debug_redacts_password() {
    let rendered = format!("{:?}", sample_config());
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("secret"));
    assert!(rendered.contains("localhost"));
}
