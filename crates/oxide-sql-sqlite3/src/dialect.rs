//! SQLite dialect implementation.

use oxide_sql_core::builder::{InsertQuery, Param};
use oxide_sql_core::dialect::Dialect;
use oxide_sql_core::error::Result;

/// SQLite dialect.
///
/// Differs from the generic dialect in two places:
///
/// - multi-row INSERT uses `SELECT ... UNION ALL SELECT ...`, since
///   `VALUES (...), (...)` is unavailable before SQLite 3.7.11;
/// - an offset without a row limit is written `LIMIT -1 OFFSET n`, since
///   SQLite has no OFFSET without LIMIT.
#[derive(Debug, Clone, Copy)]
pub struct SqliteDialect {
    separator: &'static str,
}

impl SqliteDialect {
    /// Creates a SQLite dialect that puts each clause on its own line.
    #[must_use]
    pub const fn new() -> Self {
        Self { separator: "\n" }
    }

    /// Creates a SQLite dialect that renders statements on a single line.
    #[must_use]
    pub const fn compact() -> Self {
        Self { separator: " " }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quote(&self) -> char {
        '"' // SQLite also accepts backticks, but double quotes are standard
    }

    fn separator(&self) -> &'static str {
        self.separator
    }

    fn unbounded_limit(&self) -> Option<&'static str> {
        Some("-1")
    }

    /// Renders `INSERT INTO t (cols) SELECT ... UNION ALL SELECT ...`.
    ///
    /// A single row goes through the same form.
    fn build_insert(&self, query: &InsertQuery) -> Result<(String, Vec<Param>)> {
        let rendered = query.render_rows()?;
        let nl = self.separator;
        let sql = format!(
            "INSERT INTO {}{nl}({}){nl}SELECT {}",
            query.table(),
            rendered.columns.join(", "),
            rendered.rows.join(&format!("{nl}UNION ALL SELECT "))
        );
        Ok((sql, rendered.params))
    }
}
