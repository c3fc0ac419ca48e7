//! # oxide-sql-sqlite3
//!
//! SQLite3 support for `oxide-sql-core`: a dialect, typed parameter binding
//! and a single-connection connector built on `rusqlite`.
//!
//! # How SQLite differs from the generic dialect
//!
//! - **Multi-row INSERT**: rendered as
//!   `INSERT INTO t (cols) SELECT ... UNION ALL SELECT ...`. The
//!   [`VALUES` list form] only exists since SQLite 3.7.11, while the
//!   connector supports libraries from [`MINIMUM_VERSION`] on.
//! - **OFFSET without LIMIT**: SQLite's [LIMIT clause] has no standalone
//!   OFFSET, so an unbounded limit is written `LIMIT -1`.
//! - **Typed binding**: every parameter is bound with an explicit native
//!   type (integer, float, text, blob, null). Values with no native type
//!   are rejected before anything is bound.
//! - **One database per connection**: a connection can't switch databases;
//!   [`SqliteConnector::select_database`] only accepts the bound name.
//!
//! [`VALUES` list form]: https://www.sqlite.org/lang_insert.html
//! [LIMIT clause]: https://www.sqlite.org/lang_select.html#limitoffset
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_core::builder::{InsertQuery, InsertRow};
//! use oxide_sql_core::dialect::Dialect;
//! use oxide_sql_sqlite3::SqliteDialect;
//!
//! let query = InsertQuery::into_table("pages")
//!     .row(InsertRow::new().set("title", "Home").set("sort", 1))
//!     .row(InsertRow::new().set("title", "About"));
//!
//! let (sql, params) = SqliteDialect::new().build_insert(&query).unwrap();
//! assert_eq!(
//!     sql,
//!     "INSERT INTO pages\n(title, sort)\nSELECT ?, ?\nUNION ALL SELECT ?, ?"
//! );
//! assert!(params[3].is_null());
//! ```

pub mod bind;
pub mod config;
pub mod connector;
mod dialect;
pub mod error;
pub mod provision;
pub mod report;
pub mod result;
pub mod version;

pub use bind::{bind, classify, BoundParam, ParameterSink};
pub use config::ConnectionConfig;
pub use connector::{ConnectionState, NativeError, SqliteConnector, BUSY_TIMEOUT};
pub use dialect::SqliteDialect;
pub use error::{
    BindError, BindTypeError, ConfigError, ConnectionStateError, ConnectorError, ProvisionError,
    Result,
};
pub use report::{ErrorReport, ErrorReporter, Severity, TracingReporter};
pub use result::{QueryResult, Record};
pub use version::{engine_version, is_supported_version, require_supported_version, MINIMUM_VERSION};
