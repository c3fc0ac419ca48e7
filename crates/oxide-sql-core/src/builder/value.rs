//! SQL values and parameter handling.
//!
//! Builders never interpolate caller data into SQL text. Every value travels
//! as a [`Param`] next to a `?` placeholder, and the connector decides how to
//! hand it to the engine.

use std::fmt::{self, Write};

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: Prefer using parameterized queries instead.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                // Escape single quotes by doubling them
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex = b.iter().fold(String::new(), |mut hex, byte| {
                    let _ = write!(hex, "{byte:02X}");
                    hex
                });
                format!("X'{hex}'")
            }
        }
    }

    /// Returns the name of the value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// The native type tag a parameter is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindCategory {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit IEEE float.
    Float,
    /// UTF-8 text.
    Text,
    /// Raw bytes.
    Blob,
    /// SQL NULL.
    Null,
}

impl BindCategory {
    /// Returns the lowercase category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for BindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional query parameter.
///
/// Most parameters are plain values whose bind category follows from their
/// shape. [`Param::Typed`] forces a category, for cases where the shape alone
/// is ambiguous (text that must be stored as a blob, a flag that must be
/// stored as an integer). Composite parameters can be carried, for example
/// when they come from decoded JSON, but no engine can bind them.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A value bound according to its own shape.
    Value(SqlValue),
    /// A value bound with an explicitly declared category.
    Typed {
        /// The declared category.
        category: BindCategory,
        /// The raw value.
        value: SqlValue,
    },
    /// An ordered list of parameters.
    List(Vec<Self>),
    /// A keyed record of parameters.
    Map(Vec<(String, Self)>),
}

impl Param {
    /// A NULL parameter.
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(SqlValue::Null)
    }

    /// Creates a parameter with a forced bind category.
    #[must_use]
    pub fn typed<T: ToSqlValue>(category: BindCategory, value: T) -> Self {
        Self::Typed {
            category,
            value: value.to_sql_value(),
        }
    }

    /// Returns `true` if this parameter is a NULL value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(
            self,
            Self::Value(SqlValue::Null)
                | Self::Typed {
                    value: SqlValue::Null,
                    ..
                }
        )
    }

    /// Returns the name of the parameter's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Value(value) | Self::Typed { value, .. } => value.kind(),
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.write_str(&value.to_sql_inline()),
            Self::Typed { category, value } => {
                write!(f, "{} as {category}", value.to_sql_inline())
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl<T: ToSqlValue> From<T> for Param {
    fn from(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }
}

impl From<serde_json::Value> for Param {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Self::null(),
            Json::Bool(b) => Self::Value(SqlValue::Bool(b)),
            // u64 beyond i64::MAX and non-integral numbers fall back to floats
            Json::Number(n) => Self::Value(n.as_i64().map_or_else(
                || n.as_f64().map_or(SqlValue::Null, SqlValue::Float),
                SqlValue::Int,
            )),
            Json::String(s) => Self::Value(SqlValue::Text(s)),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sql_value_inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_sql_value_inline_blob() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x45, 0x4C, 0x4C, 0x4F]).to_sql_inline(),
            "X'48454C4C4F'"
        );
    }

    #[test]
    fn test_param_from_native() {
        assert_eq!(Param::from(42_i32), Param::Value(SqlValue::Int(42)));
        assert_eq!(Param::from(None::<i64>), Param::null());
        assert_eq!(
            Param::from("x"),
            Param::Value(SqlValue::Text(String::from("x")))
        );
    }

    #[test]
    fn test_param_typed() {
        let param = Param::typed(BindCategory::Blob, "raw");
        assert_eq!(
            param,
            Param::Typed {
                category: BindCategory::Blob,
                value: SqlValue::Text(String::from("raw")),
            }
        );
        assert!(Param::typed(BindCategory::Text, None::<&str>).is_null());
    }

    #[test]
    fn test_param_from_json() {
        assert_eq!(Param::from(json!(true)), Param::from(true));
        assert_eq!(Param::from(json!(7)), Param::from(7_i64));
        assert_eq!(Param::from(json!(1.5)), Param::from(1.5_f64));
        assert_eq!(Param::from(json!(null)), Param::null());
        assert_eq!(
            Param::from(json!([1, "a"])),
            Param::List(vec![Param::from(1_i64), Param::from("a")])
        );
        assert!(matches!(Param::from(json!({"a": 1})), Param::Map(_)));
    }

    #[test]
    fn test_param_display() {
        assert_eq!(Param::from("it's").to_string(), "'it''s'");
        assert_eq!(
            Param::typed(BindCategory::Integer, true).to_string(),
            "TRUE as integer"
        );
        assert_eq!(
            Param::from(json!({"ids": [1, 2]})).to_string(),
            "{ids: [1, 2]}"
        );
    }
}
