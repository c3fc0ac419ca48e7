//! The SQLite connector.
//!
//! A [`SqliteConnector`] owns at most one native connection for its whole
//! lifetime. Every statement goes through the same path: prepare, bind,
//! step to completion. Failures update the connector's last error, are
//! handed to the [`ErrorReporter`] with the caller's [`Severity`], and are
//! returned.

use std::fmt;
use std::time::Duration;

use oxide_sql_core::builder::{InsertQuery, Param, SelectQuery};
use oxide_sql_core::dialect::Dialect;
use rusqlite::{ffi, Connection, OpenFlags};
use tracing::{debug, info};

use crate::bind::bind;
use crate::config::ConnectionConfig;
use crate::dialect::SqliteDialect;
use crate::error::{BindError, ConnectionStateError, ConnectorError, Result};
use crate::report::{ErrorReport, ErrorReporter, Severity, TracingReporter};
use crate::result::QueryResult;
use crate::version;

/// How long the engine waits on a locked database before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(60);

/// Message the engine reports when the last call succeeded.
const NOT_AN_ERROR: &str = "not an error";

/// Whether a connector currently holds a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection.
    Disconnected,
    /// A connection is open.
    Connected,
}

/// An error recorded from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    code: Option<i32>,
    message: String,
}

impl NativeError {
    /// Creates a record from an extended result code and message.
    #[must_use]
    pub fn new(code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the extended result code, when the engine supplied one.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the message, or `None` if the record means success.
    ///
    /// The result code decides when present; otherwise the message is
    /// compared against the engine's success text.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let success = self
            .code
            .map_or(self.message == NOT_AN_ERROR, |code| code & 0xff == ffi::SQLITE_OK);
        if success {
            None
        } else {
            Some(&self.message)
        }
    }
}

impl From<&rusqlite::Error> for NativeError {
    fn from(err: &rusqlite::Error) -> Self {
        let message = match err {
            rusqlite::Error::SqliteFailure(_, Some(message))
            | rusqlite::Error::SqlInputError { msg: message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            code: err.sqlite_error().map(|e| e.extended_code),
            message,
        }
    }
}

impl From<&BindError> for NativeError {
    fn from(err: &BindError) -> Self {
        match err {
            BindError::Native { source, .. } => Self::from(source),
            other => Self::new(None, other.to_string()),
        }
    }
}

enum Failure {
    Prepare(rusqlite::Error),
    Bind(BindError),
    Execute(rusqlite::Error),
}

impl Failure {
    fn native(&self) -> NativeError {
        match self {
            Self::Prepare(err) | Self::Execute(err) => NativeError::from(err),
            Self::Bind(err) => NativeError::from(err),
        }
    }
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    params: Option<&[Param]>,
) -> std::result::Result<QueryResult, Failure> {
    let mut statement = conn.prepare(sql).map_err(Failure::Prepare)?;
    if let Some(params) = params {
        bind(&mut statement, params).map_err(Failure::Bind)?;
    }
    // The engine compiles blank input to no statement at all; stepping it
    // would be API misuse.
    if is_blank_sql(sql) {
        return Ok(QueryResult::default());
    }
    QueryResult::collect(&mut statement).map_err(Failure::Execute)
}

/// Returns `true` if `sql` holds only whitespace, semicolons and comments.
fn is_blank_sql(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return rest.is_empty();
        }
    }
}

/// A single-connection SQLite connector.
///
/// ```
/// use oxide_sql_sqlite3::{ConnectionConfig, Severity, SqliteConnector};
/// use oxide_sql_core::builder::{InsertQuery, InsertRow};
///
/// let dir = tempfile::tempdir()?;
/// let config = ConnectionConfig::new(dir.path(), "doc.sqlite")?;
/// let mut db = SqliteConnector::open(&config)?;
///
/// db.query("CREATE TABLE t (a INTEGER, b TEXT)", Severity::Error)?;
/// let query = InsertQuery::into_table("t")
///     .row(InsertRow::new().set("a", 1).set("b", "x"))
///     .row(InsertRow::new().set("a", 2));
/// assert_eq!(db.insert(&query, Severity::Error)?, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SqliteConnector {
    conn: Option<Connection>,
    database: Option<String>,
    used: bool,
    last_error: Option<NativeError>,
    reporter: Box<dyn ErrorReporter>,
    dialect: SqliteDialect,
}

impl SqliteConnector {
    /// Creates a disconnected connector reporting through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(TracingReporter)
    }

    /// Creates a disconnected connector with a custom error reporter.
    #[must_use]
    pub fn with_reporter(reporter: impl ErrorReporter + 'static) -> Self {
        Self {
            conn: None,
            database: None,
            used: false,
            last_error: None,
            reporter: Box::new(reporter),
            dialect: SqliteDialect::new(),
        }
    }

    /// Creates a connector and connects it.
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        let mut connector = Self::new();
        connector.connect(config)?;
        Ok(connector)
    }

    /// Opens `<path>/<database>`, creating the file if absent.
    ///
    /// A configured key is passed to the engine with `PRAGMA key`.
    ///
    /// # Errors
    ///
    /// - [`ConnectionStateError::AlreadyConnected`] if this connector has
    ///   connected before, even if it was unloaded since.
    /// - [`ConnectorError::Config`] for an invalid configuration.
    /// - [`ConnectorError::Open`] if the engine cannot open the file.
    pub fn connect(&mut self, config: &ConnectionConfig) -> Result<()> {
        if self.used {
            return Err(ConnectionStateError::AlreadyConnected(self.database.clone()).into());
        }
        config.validate()?;

        let path = config.file_path();
        let open_error = |source| ConnectorError::Open {
            path: path.clone(),
            source,
        };

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&path, flags).map_err(open_error)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;
        if let Some(key) = config.key() {
            conn.pragma_update(None, "key", key).map_err(open_error)?;
        }

        info!(
            database = %config.database(),
            path = %path.display(),
            encrypted = config.key().is_some(),
            "Connected to SQLite database"
        );
        self.conn = Some(conn);
        self.database = Some(config.database().to_owned());
        self.used = true;
        Ok(())
    }

    /// Returns the connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        if self.conn.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Returns `true` while a connection is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the bound database name.
    #[must_use]
    pub fn selected_database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Returns the dialect statements are rendered with.
    #[must_use]
    pub const fn dialect(&self) -> &SqliteDialect {
        &self.dialect
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| ConnectionStateError::NotConnected.into())
    }

    /// Prepares `sql`, binds `params` by position and runs it.
    ///
    /// # Errors
    ///
    /// - [`ConnectionStateError::NotConnected`] without a connection.
    /// - [`ConnectorError::Prepare`], [`ConnectorError::Bind`] or
    ///   [`ConnectorError::Execute`], after reporting at `severity`.
    pub fn prepared_query(
        &mut self,
        sql: &str,
        params: &[Param],
        severity: Severity,
    ) -> Result<QueryResult> {
        self.run(sql, Some(params), severity)
    }

    /// Runs `sql` without parameters.
    ///
    /// # Errors
    ///
    /// As [`prepared_query`](Self::prepared_query), minus binding.
    pub fn query(&mut self, sql: &str, severity: Severity) -> Result<QueryResult> {
        self.run(sql, None, severity)
    }

    /// Renders and runs a multi-row insert; returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Build`] for an empty insert, before anything is sent
    /// to the engine; otherwise as [`prepared_query`](Self::prepared_query).
    pub fn insert(&mut self, query: &InsertQuery, severity: Severity) -> Result<u64> {
        self.connection()?;
        let (sql, params) = self.dialect.build_insert(query)?;
        self.prepared_query(&sql, &params, severity)?;
        self.affected_rows()
    }

    /// Renders and runs a select.
    ///
    /// # Errors
    ///
    /// As [`prepared_query`](Self::prepared_query).
    pub fn select(&mut self, query: &SelectQuery, severity: Severity) -> Result<QueryResult> {
        self.connection()?;
        let (sql, params) = self.dialect.build_select(query);
        self.prepared_query(&sql, &params, severity)
    }

    fn run(
        &mut self,
        sql: &str,
        params: Option<&[Param]>,
        severity: Severity,
    ) -> Result<QueryResult> {
        let conn = self.connection()?;
        debug!(
            sql = %sql,
            params = params.map_or(0, <[Param]>::len),
            "Executing SQL"
        );

        match run_statement(conn, sql, params) {
            Ok(result) => {
                self.last_error = None;
                Ok(result)
            }
            Err(failure) => Err(self.fail(sql, params.unwrap_or_default(), failure, severity)),
        }
    }

    fn fail(
        &mut self,
        sql: &str,
        params: &[Param],
        failure: Failure,
        severity: Severity,
    ) -> ConnectorError {
        let native = failure.native();
        let report = ErrorReport {
            message: native.message().map(String::from),
            sql: sql.to_owned(),
            parameters: params.iter().map(ToString::to_string).collect(),
        };
        self.last_error = Some(native);
        self.reporter.report(&report, severity);

        match failure {
            Failure::Prepare(source) => ConnectorError::Prepare { report, source },
            Failure::Bind(source) => ConnectorError::Bind { report, source },
            Failure::Execute(source) => ConnectorError::Execute { report, source },
        }
    }

    /// Returns the number of rows changed by the last statement.
    ///
    /// # Errors
    ///
    /// [`ConnectionStateError::NotConnected`].
    pub fn affected_rows(&self) -> Result<u64> {
        Ok(self.connection()?.changes())
    }

    /// Returns the rowid of the last inserted row.
    ///
    /// # Errors
    ///
    /// [`ConnectionStateError::NotConnected`].
    pub fn generated_id(&self) -> Result<i64> {
        Ok(self.connection()?.last_insert_rowid())
    }

    /// Returns the last recorded engine error, or `None` if the last
    /// statement succeeded.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().and_then(NativeError::message)
    }

    /// Returns the full last error record, including its result code.
    #[must_use]
    pub const fn last_native_error(&self) -> Option<&NativeError> {
        self.last_error.as_ref()
    }

    /// Accepts only the database this connector is bound to.
    ///
    /// SQLite connections can't switch databases; open a new connector
    /// instead.
    ///
    /// # Errors
    ///
    /// [`ConnectionStateError::DatabaseSwitch`] for any other name, and for
    /// any name while disconnected.
    pub fn select_database(&mut self, name: &str) -> Result<()> {
        if self.is_active() && self.database.as_deref() == Some(name) {
            return Ok(());
        }
        Err(ConnectionStateError::DatabaseSwitch {
            current: self.database.clone(),
            requested: name.to_owned(),
        }
        .into())
    }

    /// Closes the connection and forgets the bound database.
    ///
    /// # Errors
    ///
    /// - [`ConnectionStateError::NotConnected`] without a connection.
    /// - [`ConnectorError::Close`] if the engine fails to close cleanly; the
    ///   connector is disconnected regardless.
    pub fn unload_database(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(ConnectionStateError::NotConnected)?;
        let database = self.database.take();
        self.last_error = None;

        conn.close().map_err(|(_, err)| ConnectorError::Close(err))?;
        info!(database = ?database, "Closed SQLite database");
        Ok(())
    }

    /// Returns the linked SQLite library version.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn version(&self) -> &'static str {
        version::engine_version()
    }

    /// Escapes `value` for use inside a single-quoted literal.
    #[must_use]
    pub fn escape_string(&self, value: &str) -> String {
        self.dialect.escape_string(value)
    }

    /// Escapes and single-quotes `value`.
    #[must_use]
    pub fn quote_string(&self, value: &str) -> String {
        format!("'{}'", self.escape_string(value))
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SqliteConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnector")
            .field("state", &self.state())
            .field("database", &self.database)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_prefers_code() {
        let ok = NativeError::new(Some(ffi::SQLITE_OK), "anything");
        assert_eq!(ok.message(), None);

        let busy = NativeError::new(Some(ffi::SQLITE_BUSY), "database is locked");
        assert_eq!(busy.message(), Some("database is locked"));

        // a failure whose text happens to match the success message
        let odd = NativeError::new(Some(ffi::SQLITE_ERROR), NOT_AN_ERROR);
        assert_eq!(odd.message(), Some(NOT_AN_ERROR));
    }

    #[test]
    fn test_native_error_falls_back_to_message() {
        assert_eq!(NativeError::new(None, NOT_AN_ERROR).message(), None);
        assert_eq!(NativeError::new(None, "no such table: t").message(), Some("no such table: t"));
    }

    #[test]
    fn test_disconnected_connector() {
        let mut db = SqliteConnector::new();
        assert_eq!(db.state(), ConnectionState::Disconnected);
        assert!(db.query("SELECT 1", Severity::Error).unwrap_err().is_connection_state());
        assert!(db.affected_rows().unwrap_err().is_connection_state());
        assert!(db.unload_database().unwrap_err().is_connection_state());
        assert_eq!(db.last_error(), None);
    }

    #[test]
    fn test_quote_string() {
        let db = SqliteConnector::new();
        assert_eq!(db.escape_string("it's"), "it''s");
        assert_eq!(db.quote_string("it's"), "'it''s'");
    }

    #[test]
    fn test_blank_sql() {
        assert!(is_blank_sql(""));
        assert!(is_blank_sql("  \n\t"));
        assert!(is_blank_sql(";"));
        assert!(is_blank_sql("-- nothing here"));
        assert!(is_blank_sql("/* a */ -- b\n ;"));
        assert!(!is_blank_sql("SELECT 1"));
        assert!(!is_blank_sql("-- note\nSELECT 1"));
        assert!(!is_blank_sql("/* unterminated SELECT 1"));
    }

    #[test]
    fn test_in_memory_statement_path() {
        let conn = Connection::open_in_memory().unwrap();
        let result = run_statement(&conn, "SELECT ? + 1 AS n", Some(&[Param::from(41)])).ok();
        let result = result.unwrap();
        assert_eq!(result.columns(), ["n"]);
        assert_eq!(result.value(), Some(&rusqlite::types::Value::Integer(42)));

        let failure = run_statement(&conn, "SELEC 1", None).err().unwrap();
        assert!(matches!(failure, Failure::Prepare(_)));
        assert!(failure.native().message().is_some());
    }
}
