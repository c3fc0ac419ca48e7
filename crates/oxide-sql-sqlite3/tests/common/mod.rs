#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use oxide_sql_sqlite3::{ConnectionConfig, ErrorReport, QueryResult, Severity, SqliteConnector};
use rusqlite::types::Value;
use tempfile::TempDir;

/// Reports seen by a [`recording_reporter`].
pub type Seen = Rc<RefCell<Vec<(ErrorReport, Severity)>>>;

/// A connector bound to a database in its own temporary directory.
pub struct TestDb {
    pub dir: TempDir,
    pub config: ConnectionConfig,
    pub db: SqliteConnector,
}

pub fn config_in(dir: &TempDir) -> ConnectionConfig {
    ConnectionConfig::new(dir.path(), "test.sqlite")
        .unwrap_or_else(|e| panic!("Invalid test configuration: {e}"))
}

/// Opens a fresh database with the default reporter.
pub fn open() -> TestDb {
    open_with(SqliteConnector::new())
}

/// Opens a fresh database whose failures are recorded.
pub fn open_recording() -> (TestDb, Seen) {
    let seen: Seen = Rc::default();
    let sink = Rc::clone(&seen);
    let connector = SqliteConnector::with_reporter(move |report: &ErrorReport, severity: Severity| {
        sink.borrow_mut().push((report.clone(), severity));
    });
    (open_with(connector), seen)
}

fn open_with(mut db: SqliteConnector) -> TestDb {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("Failed to create temp dir: {e}"));
    let config = config_in(&dir);
    db.connect(&config)
        .unwrap_or_else(|e| panic!("Failed to connect to {}: {e}", config.file_path().display()));
    TestDb { dir, config, db }
}

/// Runs SQL that must succeed.
pub fn exec(db: &mut SqliteConnector, sql: &str) -> QueryResult {
    db.query(sql, Severity::Error)
        .unwrap_or_else(|e| panic!("Failed to run: {sql}\nError: {e}"))
}

pub fn text(s: &str) -> Value {
    Value::Text(String::from(s))
}
