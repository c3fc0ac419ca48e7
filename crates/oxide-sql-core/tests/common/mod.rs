#![allow(dead_code)]

use oxide_sql_core::builder::{count_placeholders, InsertQuery, InsertRow, Param};
use oxide_sql_core::dialect::{Dialect, GenericDialect};

/// Builds a row from `(column, value)` pairs.
pub fn row(values: &[(&str, Param)]) -> InsertRow {
    values
        .iter()
        .fold(InsertRow::new(), |row, (column, value)| row.set(column, value.clone()))
}

/// Renders with the generic dialect, panicking on builder errors.
pub fn render_insert(query: &InsertQuery) -> (String, Vec<Param>) {
    GenericDialect::new()
        .build_insert(query)
        .unwrap_or_else(|e| panic!("Failed to render insert into {}: {e}", query.table()))
}

/// Asserts that SQL and parameters are in step.
pub fn assert_aligned(sql: &str, params: &[Param]) {
    assert_eq!(
        count_placeholders(sql),
        params.len(),
        "Placeholder/parameter mismatch.\n  SQL:    {sql}\n  Params: {params:?}"
    );
}
