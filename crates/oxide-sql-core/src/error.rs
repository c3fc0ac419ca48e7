//! Errors raised while turning a query description into SQL text.

/// A malformed query description.
///
/// Builder errors are detected before any SQL reaches a database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A LIMIT specification that is neither null nor numeric.
    #[error("wrong format for LIMIT: {0}")]
    InvalidLimit(String),

    /// An INSERT without any row or without any column.
    #[error("INSERT INTO {table} has no values to insert")]
    EmptyInsert {
        /// Target table.
        table: String,
    },

    /// A fragment whose placeholders and parameters disagree.
    #[error("fragment `{sql}` has {placeholders} placeholder(s) but {params} parameter(s)")]
    PlaceholderMismatch {
        /// The offending SQL fragment.
        sql: String,
        /// Placeholders found in the fragment.
        placeholders: usize,
        /// Parameters supplied with it.
        params: usize,
    },
}

/// Result type for query building.
pub type Result<T> = std::result::Result<T, BuildError>;
