//! SQL fragments with their bound parameters.

use super::value::Param;
use crate::error::{BuildError, Result};

/// Creates a column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        table: None,
        name: String::from(name),
    }
}

/// A column reference.
#[derive(Debug, Clone)]
pub struct Column {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.table
            .as_ref()
            .map_or_else(|| self.name.clone(), |t| format!("{t}.{}", self.name))
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), "=", Fragment::value(value))
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), "!=", Fragment::value(value))
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), "<", Fragment::value(value))
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), "<=", Fragment::value(value))
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), ">", Fragment::value(value))
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq(self, value: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), ">=", Fragment::value(value))
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Fragment {
        Fragment::postfix(self.into(), "IS NULL")
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Fragment {
        Fragment::postfix(self.into(), "IS NOT NULL")
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like(self, pattern: impl Into<Param>) -> Fragment {
        Fragment::binary(self.into(), "LIKE", Fragment::value(pattern))
    }

    /// Creates an IN expression with one placeholder per value.
    #[must_use]
    pub fn in_list<T: Into<Param>>(self, values: Vec<T>) -> Fragment {
        let params: Vec<Param> = values.into_iter().map(Into::into).collect();
        let placeholders = vec!["?"; params.len()].join(", ");
        let column: Fragment = self.into();
        Fragment {
            sql: format!("{} IN ({placeholders})", column.sql),
            params,
        }
    }
}

/// A piece of SQL together with the parameters for its placeholders.
///
/// The number of `?` placeholders in the SQL always equals the number of
/// parameters: [`Fragment::new`] rejects anything else, and every combinator
/// keeps the two in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    sql: String,
    params: Vec<Param>,
}

impl Fragment {
    /// Creates a fragment from SQL text and its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::PlaceholderMismatch`] when the placeholder count
    /// of `sql` differs from `params.len()`.
    pub fn new(sql: impl Into<String>, params: Vec<Param>) -> Result<Self> {
        let sql = sql.into();
        let placeholders = count_placeholders(&sql);
        if placeholders != params.len() {
            return Err(BuildError::PlaceholderMismatch {
                sql,
                placeholders,
                params: params.len(),
            });
        }
        Ok(Self { sql, params })
    }

    /// Creates a fragment from SQL text without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::PlaceholderMismatch`] if `sql` contains a
    /// placeholder.
    pub fn raw(sql: impl Into<String>) -> Result<Self> {
        Self::new(sql, Vec::new())
    }

    /// Creates a single `?` placeholder bound to `value`.
    #[must_use]
    pub fn value(value: impl Into<Param>) -> Self {
        Self {
            sql: String::from("?"),
            params: vec![value.into()],
        }
    }

    /// Creates a `?` placeholder bound to NULL.
    #[must_use]
    pub fn null() -> Self {
        Self::value(Param::null())
    }

    fn binary(left: Self, op: &str, right: Self) -> Self {
        let mut params = left.params;
        params.extend(right.params);
        Self {
            sql: format!("{} {op} {}", left.sql, right.sql),
            params,
        }
    }

    fn postfix(operand: Self, op: &str) -> Self {
        Self {
            sql: format!("{} {op}", operand.sql),
            params: operand.params,
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(self, "AND", other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(self, "OR", other)
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self {
            sql: format!("({})", self.sql),
            params: self.params,
        }
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Consumes the fragment and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<Param>) {
        (self.sql, self.params)
    }
}

impl From<Column> for Fragment {
    fn from(col: Column) -> Self {
        Self {
            sql: col.to_sql(),
            params: vec![],
        }
    }
}

/// Counts `?` placeholders, skipping quoted strings and identifiers.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match quote {
            // A doubled quote toggles out and straight back in.
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '[' => quote = Some(']'),
                '?' => count += 1,
                _ => {}
            },
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::SqlValue;

    #[test]
    fn test_column_eq() {
        let expr = col("name").eq("Alice");
        assert_eq!(expr.sql(), "name = ?");
        assert_eq!(expr.params().len(), 1);
    }

    #[test]
    fn test_column_comparison() {
        assert_eq!(col("age").gt(18).sql(), "age > ?");
        assert_eq!(col("age").lt_eq(65).sql(), "age <= ?");
    }

    #[test]
    fn test_column_operators() {
        assert_eq!(col("status").not_eq("draft").sql(), "status != ?");
        assert_eq!(col("age").lt(13).sql(), "age < ?");
        assert_eq!(col("age").gt_eq(21).sql(), "age >= ?");

        let expr = col("title").like("%rust%");
        assert_eq!(expr.sql(), "title LIKE ?");
        assert_eq!(expr.params(), [Param::from("%rust%")]);
    }

    #[test]
    fn test_is_null() {
        let expr = col("deleted_at").is_null();
        assert_eq!(expr.sql(), "deleted_at IS NULL");
        assert!(expr.params().is_empty());
        let expr = col("published_at").is_not_null();
        assert_eq!(expr.sql(), "published_at IS NOT NULL");
        assert!(expr.params().is_empty());
    }

    #[test]
    fn test_in_list() {
        let expr = col("status").in_list(vec!["active", "pending"]);
        assert_eq!(expr.sql(), "status IN (?, ?)");
        assert_eq!(expr.params().len(), 2);
    }

    #[test]
    fn test_and_or() {
        let expr = col("active")
            .eq(true)
            .and(col("age").gt(18).or(col("verified").eq(true)).paren());
        assert_eq!(expr.sql(), "active = ? AND (age > ? OR verified = ?)");
        assert_eq!(expr.params().len(), 3);
    }

    #[test]
    fn test_qualified_column() {
        let expr = Column::qualified("users", "name").eq("Bob");
        assert_eq!(expr.sql(), "users.name = ?");
    }

    #[test]
    fn test_new_checks_placeholders() {
        let fragment = Fragment::new("COALESCE(?, ?)", vec![Param::from(1), Param::null()]);
        assert!(fragment.is_ok());

        let err = Fragment::new("LOWER(?)", vec![]).unwrap_err();
        assert_eq!(
            err,
            BuildError::PlaceholderMismatch {
                sql: String::from("LOWER(?)"),
                placeholders: 1,
                params: 0,
            }
        );
    }

    #[test]
    fn test_raw_rejects_placeholders() {
        assert!(Fragment::raw("CURRENT_TIMESTAMP").is_ok());
        assert!(Fragment::raw("? + 1").is_err());
    }

    #[test]
    fn test_count_placeholders_skips_quotes() {
        assert_eq!(count_placeholders("?"), 1);
        assert_eq!(count_placeholders("'?' || ?"), 1);
        assert_eq!(count_placeholders("'it''s ?' || ?"), 1);
        assert_eq!(count_placeholders("\"a?\" = ? AND [b?] = ?"), 2);
        assert_eq!(count_placeholders("plain"), 0);
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious = "'; DROP TABLE users; --";
        let expr = col("name").eq(malicious);
        assert_eq!(expr.sql(), "name = ?");
        assert!(matches!(&expr.params()[0], Param::Value(SqlValue::Text(s)) if s == malicious));
    }
}
