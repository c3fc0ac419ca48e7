//! Multi-row INSERT description.
//!
//! An [`InsertQuery`] only describes what to insert. Turning it into SQL is
//! the job of a [`Dialect`](crate::dialect::Dialect), because engines
//! disagree on multi-row syntax.

use super::expr::Fragment;
use super::value::Param;
use crate::error::{BuildError, Result};

/// Column assignments for one inserted row.
///
/// Columns keep the order in which they were first assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertRow {
    assignments: Vec<(String, Fragment)>,
}

impl InsertRow {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Assigns a parameterized value to a column.
    #[must_use]
    pub fn set(self, column: &str, value: impl Into<Param>) -> Self {
        self.assign(column, Fragment::value(value))
    }

    /// Assigns an SQL fragment to a column, replacing any earlier assignment.
    #[must_use]
    pub fn assign(mut self, column: &str, fragment: Fragment) -> Self {
        if let Some(slot) = self.assignments.iter_mut().find(|(c, _)| c == column) {
            slot.1 = fragment;
        } else {
            self.assignments.push((String::from(column), fragment));
        }
        self
    }

    /// Returns the fragment assigned to `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Fragment> {
        self.assignments
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, fragment)| fragment)
    }

    /// Returns the assigned columns in assignment order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(c, _)| c.as_str())
    }

    /// Returns the number of assigned columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` if no column is assigned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// An INSERT of one or more rows into a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    rows: Vec<InsertRow>,
}

impl InsertQuery {
    /// Starts an INSERT into `table`.
    ///
    /// The table name is emitted as given; quote it beforehand if needed.
    #[must_use]
    pub fn into_table(table: &str) -> Self {
        Self {
            table: String::from(table),
            rows: Vec::new(),
        }
    }

    /// Adds a row.
    #[must_use]
    pub fn row(mut self, row: InsertRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Adds a row in place.
    pub fn push_row(&mut self, row: InsertRow) {
        self.rows.push(row);
    }

    /// Returns the target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[InsertRow] {
        &self.rows
    }

    /// Returns every column assigned by any row, in first-seen order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for column in self.rows.iter().flat_map(InsertRow::columns) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Lays out every row against the shared column list.
    ///
    /// Each rendered row holds exactly one value slot per column. A column
    /// that this row does not assign (but a sibling row does) becomes a `?`
    /// bound to NULL. Parameters are collected row by row, then column by
    /// column, so they line up with the placeholders of the joined rows.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyInsert`] when there are no rows or no
    /// columns.
    pub fn render_rows(&self) -> Result<RenderedRows> {
        let columns = self.columns();
        if self.rows.is_empty() || columns.is_empty() {
            return Err(BuildError::EmptyInsert {
                table: self.table.clone(),
            });
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut params = Vec::new();
        for row in &self.rows {
            let mut parts = Vec::with_capacity(columns.len());
            for column in &columns {
                if let Some(fragment) = row.get(column) {
                    parts.push(fragment.sql());
                    params.extend(fragment.params().iter().cloned());
                } else {
                    parts.push("?");
                    params.push(Param::null());
                }
            }
            rows.push(parts.join(", "));
        }

        Ok(RenderedRows {
            columns: columns.into_iter().map(String::from).collect(),
            rows,
            params,
        })
    }
}

/// Row value lists of an [`InsertQuery`], ready to be wrapped in
/// dialect-specific syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRows {
    /// Column names, in output order.
    pub columns: Vec<String>,
    /// One comma-separated value list per row.
    pub rows: Vec<String>,
    /// Parameters for every placeholder across all rows.
    pub params: Vec<Param>,
}
