//! SELECT description.
//!
//! Like [`InsertQuery`](super::InsertQuery), a [`SelectQuery`] is rendered by
//! a [`Dialect`](crate::dialect::Dialect), which owns the LIMIT/OFFSET
//! syntax.

use super::expr::Fragment;
use super::limit::Limit;

/// A single-table SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    distinct: bool,
    columns: Vec<String>,
    from: String,
    joins: Vec<String>,
    where_clause: Option<Fragment>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<Limit>,
}

impl SelectQuery {
    /// Starts a `SELECT *` from `table`.
    #[must_use]
    pub fn from_table(table: &str) -> Self {
        Self {
            distinct: false,
            columns: vec![String::from("*")],
            from: String::from(table),
            joins: vec![],
            where_clause: None,
            group_by: vec![],
            order_by: vec![],
            limit: None,
        }
    }

    /// Specifies the columns to select.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("INNER JOIN {table} ON {on}"));
        self
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("LEFT JOIN {table} ON {on}"));
        self
    }

    /// Adds a WHERE clause. Calling it again ANDs the conditions.
    #[must_use]
    pub fn where_clause(mut self, expr: Fragment) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Adds a GROUP BY clause.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Adds an ORDER BY clause.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Adds an ORDER BY DESC clause.
    #[must_use]
    pub fn order_by_desc(mut self, cols: &[&str]) -> Self {
        self.order_by = cols.iter().map(|s| format!("{s} DESC")).collect();
        self
    }

    /// Sets the LIMIT specification.
    #[must_use]
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Returns whether DISTINCT is set.
    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Returns the selected columns.
    #[must_use]
    pub fn selected_columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the source table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.from
    }

    /// Returns the JOIN clauses.
    #[must_use]
    pub fn joins(&self) -> &[String] {
        &self.joins
    }

    /// Returns the WHERE condition.
    #[must_use]
    pub const fn condition(&self) -> Option<&Fragment> {
        self.where_clause.as_ref()
    }

    /// Returns the GROUP BY columns.
    #[must_use]
    pub fn grouping(&self) -> &[String] {
        &self.group_by
    }

    /// Returns the ORDER BY terms.
    #[must_use]
    pub fn ordering(&self) -> &[String] {
        &self.order_by
    }

    /// Returns the LIMIT specification.
    #[must_use]
    pub const fn limit_spec(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }
}
