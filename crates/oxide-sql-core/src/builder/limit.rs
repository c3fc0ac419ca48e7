//! LIMIT / OFFSET specifications.

use serde_json::Value as Json;

use crate::error::{BuildError, Result};

/// How many rows a SELECT returns, and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    /// Pre-formatted clause body, emitted verbatim after `LIMIT`.
    Literal(String),
    /// Structured row count and start offset.
    Range(LimitRange),
}

/// Structured form of a [`Limit`].
///
/// A missing `limit` means "no upper bound"; dialects that cannot express an
/// offset without a bound substitute their own unbounded marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitRange {
    /// Maximum number of rows, `None` for unbounded.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub start: Option<u64>,
}

impl Limit {
    /// A literal clause body such as `"10"` or `"10 OFFSET 20"`.
    #[must_use]
    pub fn literal(body: impl Into<String>) -> Self {
        Self::Literal(body.into())
    }

    /// At most `limit` rows.
    #[must_use]
    pub const fn rows(limit: u64) -> Self {
        Self::Range(LimitRange {
            limit: Some(limit),
            start: None,
        })
    }

    /// A structured range.
    #[must_use]
    pub const fn range(limit: Option<u64>, start: Option<u64>) -> Self {
        Self::Range(LimitRange { limit, start })
    }

    /// Validates a loosely typed limit, as found in JSON request bodies and
    /// configuration files.
    ///
    /// - `null`, `""`, `0` and `{}` mean no limit at all;
    /// - other numbers and strings are literal clause bodies;
    /// - an object must carry a `limit` key holding `null` or a non-negative
    ///   integer (a JSON number or numeric string); an optional `start` is
    ///   used when numeric and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidLimit`] for objects without a valid
    /// `limit`, and for arrays and booleans.
    pub fn from_json(value: &Json) -> Result<Option<Self>> {
        match value {
            Json::Null => Ok(None),
            Json::Number(n) if n.as_u64() == Some(0) => Ok(None),
            Json::Number(n) => Ok(Some(Self::Literal(n.to_string()))),
            Json::String(s) if s.is_empty() => Ok(None),
            Json::String(s) => Ok(Some(Self::Literal(s.clone()))),
            Json::Object(map) if map.is_empty() => Ok(None),
            Json::Object(map) => {
                let limit = match map.get("limit") {
                    Some(Json::Null) => None,
                    Some(raw) => Some(
                        as_count(raw).ok_or_else(|| BuildError::InvalidLimit(value.to_string()))?,
                    ),
                    None => return Err(BuildError::InvalidLimit(value.to_string())),
                };
                let start = map.get("start").and_then(as_count);
                Ok(Some(Self::range(limit, start)))
            }
            Json::Bool(_) | Json::Array(_) => Err(BuildError::InvalidLimit(value.to_string())),
        }
    }
}

impl From<u64> for Limit {
    fn from(limit: u64) -> Self {
        Self::rows(limit)
    }
}

impl From<LimitRange> for Limit {
    fn from(range: LimitRange) -> Self {
        Self::Range(range)
    }
}

fn as_count(value: &Json) -> Option<u64> {
    match value {
        Json::Number(n) => n.as_u64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
