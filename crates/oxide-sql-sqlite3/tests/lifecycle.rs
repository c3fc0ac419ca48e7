//! Integration tests for connecting, switching databases and unloading.

mod common;
use common::*;

use oxide_sql_sqlite3::provision::{prepare_db_dir, ACCESS_FILE};
use oxide_sql_sqlite3::{
    ConnectionConfig, ConnectionState, ConnectionStateError, ConnectorError, Severity,
    SqliteConnector, BUSY_TIMEOUT,
};
use rusqlite::types::Value;

fn state_error(err: ConnectorError) -> ConnectionStateError {
    match err {
        ConnectorError::ConnectionState(e) => e,
        other => panic!("Expected a connection state error, got {other:?}"),
    }
}

#[test]
fn connect_creates_the_database_file() {
    let t = open();
    assert!(t.config.file_path().is_file());
    assert_eq!(t.db.state(), ConnectionState::Connected);
    assert!(t.db.is_active());
    assert_eq!(t.db.selected_database(), Some("test.sqlite"));
}

#[test]
fn connect_sets_busy_timeout() {
    let mut t = open();
    let timeout = exec(&mut t.db, "PRAGMA busy_timeout");
    assert_eq!(timeout.value(), Some(&Value::Integer(60_000)));
    assert_eq!(BUSY_TIMEOUT.as_millis(), 60_000);
}

#[test]
fn connect_with_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir).with_key("s3cret");
    let mut db = SqliteConnector::open(&config).unwrap();
    exec(&mut db, "CREATE TABLE t (a INTEGER)");
    assert!(db.is_active());
}

#[test]
fn select_database_accepts_only_the_bound_name() {
    let mut t = open();
    t.db.select_database("test.sqlite").unwrap();

    let err = state_error(t.db.select_database("other.sqlite").unwrap_err());
    assert_eq!(
        err,
        ConnectionStateError::DatabaseSwitch {
            current: Some(String::from("test.sqlite")),
            requested: String::from("other.sqlite"),
        }
    );
    // still bound to the original database
    assert_eq!(t.db.selected_database(), Some("test.sqlite"));
}

#[test]
fn select_database_while_disconnected() {
    let mut db = SqliteConnector::new();
    let err = state_error(db.select_database("test.sqlite").unwrap_err());
    assert!(matches!(
        err,
        ConnectionStateError::DatabaseSwitch { current: None, .. }
    ));
}

#[test]
fn unload_disconnects() {
    let mut t = open();
    exec(&mut t.db, "SELECT 1");
    t.db.unload_database().unwrap();

    assert_eq!(t.db.state(), ConnectionState::Disconnected);
    assert_eq!(t.db.selected_database(), None);
    assert_eq!(
        state_error(t.db.query("SELECT 1", Severity::Error).unwrap_err()),
        ConnectionStateError::NotConnected
    );
    assert_eq!(
        state_error(t.db.generated_id().unwrap_err()),
        ConnectionStateError::NotConnected
    );
    assert!(matches!(
        state_error(t.db.select_database("test.sqlite").unwrap_err()),
        ConnectionStateError::DatabaseSwitch { .. }
    ));
}

#[test]
fn connector_connects_only_once() {
    let mut t = open();
    let again = state_error(t.db.connect(&t.config).unwrap_err());
    assert_eq!(
        again,
        ConnectionStateError::AlreadyConnected(Some(String::from("test.sqlite")))
    );

    t.db.unload_database().unwrap();
    assert!(t.db.connect(&t.config).unwrap_err().is_connection_state());

    // a fresh connector opens the same file
    let mut fresh = SqliteConnector::open(&t.config).unwrap();
    exec(&mut fresh, "SELECT 1");
}

#[test]
fn data_survives_reopening() {
    let mut t = open();
    exec(&mut t.db, "CREATE TABLE t (a TEXT)");
    exec(&mut t.db, "INSERT INTO t (a) VALUES ('kept')");
    t.db.unload_database().unwrap();

    let mut db = SqliteConnector::open(&t.config).unwrap();
    let result = exec(&mut db, "SELECT a FROM t");
    assert_eq!(result.value(), Some(&text("kept")));
}

#[test]
fn provisioned_directory_is_usable() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("assets").join(".db");
    prepare_db_dir(&dir).unwrap();
    assert!(dir.join(ACCESS_FILE).is_file());

    let config = ConnectionConfig::new(&dir, "site.sqlite").unwrap();
    let db = SqliteConnector::open(&config).unwrap();
    assert!(db.is_active());
    assert!(dir.join("site.sqlite").is_file());
}

#[test]
fn opening_a_missing_directory_fails() {
    let root = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::new(root.path().join("absent"), "x.sqlite").unwrap();
    let err = SqliteConnector::open(&config).unwrap_err();
    assert!(matches!(err, ConnectorError::Open { .. }));
}
