//! Query descriptions and parameter values.
//!
//! Queries are described independently of any database and rendered by a
//! [`Dialect`](crate::dialect::Dialect), which returns the SQL text together
//! with the parameters for its `?` placeholders, in order.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_core::builder::{InsertQuery, InsertRow};
//! use oxide_sql_core::dialect::{Dialect, GenericDialect};
//!
//! let query = InsertQuery::into_table("users")
//!     .row(InsertRow::new().set("name", "Alice").set("age", 30))
//!     .row(InsertRow::new().set("name", "Bob"));
//!
//! let (sql, params) = GenericDialect::new().build_insert(&query).unwrap();
//! assert_eq!(sql, "INSERT INTO users (name, age) VALUES (?, ?), (?, ?)");
//! assert_eq!(params.len(), 4);
//! ```

mod expr;
mod insert;
mod limit;
mod select;
pub mod value;

pub use expr::{col, count_placeholders, Column, Fragment};
pub use insert::{InsertQuery, InsertRow, RenderedRows};
pub use limit::{Limit, LimitRange};
pub use select::SelectQuery;
pub use value::{BindCategory, Param, SqlValue, ToSqlValue};
