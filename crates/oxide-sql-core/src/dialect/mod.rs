//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. This module
//! provides a trait whose default methods render ANSI-style SQL; a dialect
//! overrides only what its engine does differently.

mod generic;

pub use generic::GenericDialect;

use crate::builder::{InsertQuery, Limit, Param, SelectQuery};
use crate::error::Result;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for `MySQL`).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the parameter placeholder style.
    fn parameter_placeholder(&self) -> &'static str {
        "?"
    }

    /// Returns the text placed between clauses of a statement.
    fn separator(&self) -> &'static str {
        " "
    }

    /// Returns the LIMIT value meaning "no upper bound", if the dialect
    /// needs one to express an offset.
    fn unbounded_limit(&self) -> Option<&'static str> {
        None
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Escapes a string for use inside a single-quoted literal.
    fn escape_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Renders a multi-row INSERT and its parameters.
    ///
    /// The default uses a `VALUES (...), (...)` list.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyInsert`](crate::BuildError::EmptyInsert)
    /// when the query has no rows or no columns.
    fn build_insert(&self, query: &InsertQuery) -> Result<(String, Vec<Param>)> {
        let rendered = query.render_rows()?;
        let values: Vec<String> = rendered.rows.iter().map(|row| format!("({row})")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            query.table(),
            rendered.columns.join(", "),
            values.join(", ")
        );
        Ok((sql, rendered.params))
    }

    /// Renders a LIMIT/OFFSET clause, or an empty string for no limit.
    ///
    /// Limit and offset are inline literals and never add parameters.
    fn build_limit(&self, limit: Option<&Limit>) -> String {
        match limit {
            None => String::new(),
            Some(Limit::Literal(body)) if body.trim().is_empty() => String::new(),
            Some(Limit::Literal(body)) => format!("LIMIT {body}"),
            Some(Limit::Range(range)) => {
                let mut parts = Vec::with_capacity(2);
                match range.limit {
                    Some(n) => parts.push(format!("LIMIT {n}")),
                    None => {
                        if let Some(unbounded) = self.unbounded_limit() {
                            parts.push(format!("LIMIT {unbounded}"));
                        }
                    }
                }
                // OFFSET 0 is a no-op
                if let Some(start) = range.start.filter(|&start| start != 0) {
                    parts.push(format!("OFFSET {start}"));
                }
                parts.join(" ")
            }
        }
    }

    /// Renders a SELECT and its parameters.
    fn build_select(&self, query: &SelectQuery) -> (String, Vec<Param>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        let distinct = if query.is_distinct() { "DISTINCT " } else { "" };
        clauses.push(format!(
            "SELECT {distinct}{}",
            query.selected_columns().join(", ")
        ));

        let mut from = format!("FROM {}", query.table());
        for join in query.joins() {
            from.push(' ');
            from.push_str(join);
        }
        clauses.push(from);

        if let Some(condition) = query.condition() {
            clauses.push(format!("WHERE {}", condition.sql()));
            params.extend(condition.params().iter().cloned());
        }

        if !query.grouping().is_empty() {
            clauses.push(format!("GROUP BY {}", query.grouping().join(", ")));
        }

        if !query.ordering().is_empty() {
            clauses.push(format!("ORDER BY {}", query.ordering().join(", ")));
        }

        let limit = self.build_limit(query.limit_spec());
        if !limit.is_empty() {
            clauses.push(limit);
        }

        (clauses.join(self.separator()), params)
    }
}
