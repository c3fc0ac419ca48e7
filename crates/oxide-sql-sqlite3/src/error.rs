//! Error types for the SQLite connector.

use std::path::PathBuf;

use oxide_sql_core::BuildError;

use crate::report::ErrorReport;

/// A parameter that cannot be mapped to any native bind category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot bind parameter {value} as it is an unsupported type ({kind})")]
pub struct BindTypeError {
    /// Rendering of the offending value.
    pub value: String,
    /// Shape or requested category that could not be bound.
    pub kind: String,
}

/// Binding a parameter sequence onto a statement failed.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// A parameter has no bind category. Nothing was bound.
    #[error(transparent)]
    Type(#[from] BindTypeError),

    /// The statement and the parameter sequence disagree on length.
    #[error("statement expects {expected} parameter(s) but {given} were supplied")]
    ParameterCount {
        /// Placeholders in the statement.
        expected: usize,
        /// Parameters supplied.
        given: usize,
    },

    /// The engine refused a bind call.
    #[error("bind failed at parameter {index}: {source}")]
    Native {
        /// 1-based parameter index.
        index: usize,
        /// Engine error.
        #[source]
        source: rusqlite::Error,
    },
}

/// Misuse of the connector's lifecycle. These indicate programming errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionStateError {
    /// An operation needed a connection but none is open.
    #[error("not connected to a database")]
    NotConnected,

    /// `connect` was called on a connector that already connected once.
    #[error("connector already bound to {0:?}; create a new connector to open another database")]
    AlreadyConnected(Option<String>),

    /// An attempt to switch the database of a bound connection.
    #[error("SQLite connections can't change databases (bound to {current:?}, requested '{requested}'); create a new connector")]
    DatabaseSwitch {
        /// The bound database, if any.
        current: Option<String>,
        /// The requested database.
        requested: String,
    },
}

/// Invalid connection settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No directory path configured.
    #[error("missing directory path")]
    MissingPath,

    /// No database filename configured.
    #[error("missing database filename")]
    MissingDatabase,

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// The linked SQLite library is older than supported.
    #[error("SQLite library version is {found}; at least {minimum} is required")]
    UnsupportedVersion {
        /// Version found.
        found: String,
        /// Minimum version supported.
        minimum: &'static str,
    },
}

/// Filesystem preparation of the database directory failed.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The directory could not be created.
    #[error("cannot create path {path}: {source}")]
    Create {
        /// Directory path.
        path: PathBuf,
        /// IO error.
        #[source]
        source: std::io::Error,
    },

    /// The access marker could not be written.
    #[error("cannot secure path {path}: {source}")]
    Secure {
        /// Directory path.
        path: PathBuf,
        /// IO error.
        #[source]
        source: std::io::Error,
    },

    /// Neither the directory nor its nearest existing ancestor is writable.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
}

/// Errors returned by [`SqliteConnector`](crate::SqliteConnector).
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Lifecycle misuse.
    #[error(transparent)]
    ConnectionState(#[from] ConnectionStateError),

    /// Invalid connection settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The query description could not be rendered.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The database file could not be opened or configured.
    #[error("failed to open database {path}: {source}")]
    Open {
        /// Database file path.
        path: PathBuf,
        /// Engine error.
        #[source]
        source: rusqlite::Error,
    },

    /// The parameters could not be bound.
    #[error("{report}")]
    Bind {
        /// What was reported.
        report: ErrorReport,
        /// Cause.
        #[source]
        source: BindError,
    },

    /// The engine rejected the SQL.
    #[error("{report}")]
    Prepare {
        /// What was reported.
        report: ErrorReport,
        /// Cause.
        #[source]
        source: rusqlite::Error,
    },

    /// The statement failed while running.
    #[error("{report}")]
    Execute {
        /// What was reported.
        report: ErrorReport,
        /// Cause.
        #[source]
        source: rusqlite::Error,
    },

    /// Closing the connection failed. The connector is disconnected anyway.
    #[error("failed to close database: {0}")]
    Close(#[source] rusqlite::Error),
}

impl ConnectorError {
    /// Returns the report passed to the error reporter, for statement errors.
    #[must_use]
    pub const fn report(&self) -> Option<&ErrorReport> {
        match self {
            Self::Bind { report, .. }
            | Self::Prepare { report, .. }
            | Self::Execute { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Returns `true` for lifecycle misuse.
    #[must_use]
    pub const fn is_connection_state(&self) -> bool {
        matches!(self, Self::ConnectionState(_))
    }
}

/// Result type for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
