//! # oxide-sql-core
//!
//! Database-agnostic query descriptions and dialect-aware SQL rendering.
//!
//! This crate provides:
//! - Query descriptions ([`InsertQuery`], [`SelectQuery`]) built from SQL
//!   fragments and positional parameters
//! - A [`Dialect`] trait that renders them to SQL text, with ANSI-style
//!   defaults that engine-specific dialects override
//! - Parameter values ([`Param`], [`SqlValue`]) that never get interpolated
//!   into SQL text
//!
//! ## Parameters stay aligned with placeholders
//!
//! Rendering returns the SQL together with one parameter per `?`, in order:
//!
//! ```rust
//! use oxide_sql_core::builder::{col, SelectQuery};
//! use oxide_sql_core::dialect::{Dialect, GenericDialect};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let query = SelectQuery::from_table("users")
//!     .columns(&["id"])
//!     .where_clause(col("name").eq(user_input));
//!
//! let (sql, params) = GenericDialect::new().build_select(&query);
//! assert_eq!(sql, "SELECT id FROM users WHERE name = ?");
//! assert_eq!(params.len(), 1);
//! ```

pub mod builder;
pub mod dialect;
pub mod error;

pub use builder::{
    col, BindCategory, Fragment, InsertQuery, InsertRow, Limit, LimitRange, Param, SelectQuery,
    SqlValue,
};
pub use dialect::{Dialect, GenericDialect};
pub use error::BuildError;
