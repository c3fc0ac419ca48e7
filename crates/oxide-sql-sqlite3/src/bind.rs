//! Parameter classification and positional binding.
//!
//! Every [`Param`] is first classified into a [`BindCategory`] and a native
//! value, then bound by 1-based position. Classification of the whole
//! sequence happens before the first bind call, so a rejected parameter
//! never leaves a half-bound statement behind.

use oxide_sql_core::builder::{BindCategory, Param, SqlValue};
use rusqlite::types::Value;
use rusqlite::Statement;

use crate::error::{BindError, BindTypeError};

/// A parameter resolved to its native category and value.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Category the value is bound with.
    pub category: BindCategory,
    /// Native value handed to the engine.
    pub value: Value,
}

/// Resolves the bind category and native value of a parameter.
///
/// Plain values are classified by shape: booleans and integers bind as
/// integers, floats as floats, text as text, bytes as blobs. A typed
/// parameter's declared category is used as is, with the value converted to
/// it. Lists and maps have no category.
///
/// # Errors
///
/// Returns [`BindTypeError`] for composite parameters and for typed
/// parameters whose value cannot be converted to the declared category.
pub fn classify(param: &Param) -> Result<BoundParam, BindTypeError> {
    match param {
        Param::Value(value) => Ok(infer(value)),
        Param::Typed { category, value } => Ok(BoundParam {
            category: *category,
            value: coerce(*category, value).ok_or_else(|| BindTypeError {
                value: value.to_sql_inline(),
                kind: format!("{} as {category}", value.kind()),
            })?,
        }),
        Param::List(_) | Param::Map(_) => Err(BindTypeError {
            value: param.to_string(),
            kind: String::from(param.kind()),
        }),
    }
}

/// Classifies a whole parameter sequence, stopping at the first rejection.
///
/// # Errors
///
/// Returns the first [`BindTypeError`].
pub fn classify_all(params: &[Param]) -> Result<Vec<BoundParam>, BindTypeError> {
    params.iter().map(classify).collect()
}

fn infer(value: &SqlValue) -> BoundParam {
    let (category, value) = match value {
        SqlValue::Null => (BindCategory::Null, Value::Null),
        SqlValue::Bool(b) => (BindCategory::Integer, Value::Integer(i64::from(*b))),
        SqlValue::Int(i) => (BindCategory::Integer, Value::Integer(*i)),
        SqlValue::Float(f) => (BindCategory::Float, Value::Real(*f)),
        SqlValue::Text(s) => (BindCategory::Text, Value::Text(s.clone())),
        SqlValue::Blob(b) => (BindCategory::Blob, Value::Blob(b.clone())),
    };
    BoundParam { category, value }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce(category: BindCategory, value: &SqlValue) -> Option<Value> {
    // NULL binds as NULL whatever the declared category.
    if matches!(value, SqlValue::Null) {
        return Some(Value::Null);
    }
    match (category, value) {
        (BindCategory::Null, _) => Some(Value::Null),

        (BindCategory::Integer, SqlValue::Int(i)) => Some(Value::Integer(*i)),
        (BindCategory::Integer, SqlValue::Bool(b)) => Some(Value::Integer(i64::from(*b))),
        (BindCategory::Integer, SqlValue::Float(f)) if f.is_finite() => {
            Some(Value::Integer(f.trunc() as i64))
        }
        (BindCategory::Integer, SqlValue::Text(s)) => s.trim().parse().ok().map(Value::Integer),

        (BindCategory::Float, SqlValue::Float(f)) => Some(Value::Real(*f)),
        (BindCategory::Float, SqlValue::Int(i)) => Some(Value::Real(*i as f64)),
        (BindCategory::Float, SqlValue::Bool(b)) => Some(Value::Real(f64::from(u8::from(*b)))),
        (BindCategory::Float, SqlValue::Text(s)) => s.trim().parse().ok().map(Value::Real),

        (BindCategory::Text, SqlValue::Text(s)) => Some(Value::Text(s.clone())),
        (BindCategory::Text, SqlValue::Int(i)) => Some(Value::Text(i.to_string())),
        (BindCategory::Text, SqlValue::Float(f)) => Some(Value::Text(f.to_string())),
        (BindCategory::Text, SqlValue::Bool(b)) => Some(Value::Text(u8::from(*b).to_string())),
        (BindCategory::Text, SqlValue::Blob(b)) => {
            String::from_utf8(b.clone()).ok().map(Value::Text)
        }

        (BindCategory::Blob, SqlValue::Blob(b)) => Some(Value::Blob(b.clone())),
        (BindCategory::Blob, SqlValue::Text(s)) => Some(Value::Blob(s.clone().into_bytes())),
        (BindCategory::Blob, SqlValue::Int(i)) => Some(Value::Blob(i.to_string().into_bytes())),
        (BindCategory::Blob, SqlValue::Float(f)) => Some(Value::Blob(f.to_string().into_bytes())),

        _ => None,
    }
}

/// Something positional parameters can be bound onto.
///
/// Implemented for prepared [`Statement`]s; tests implement it to observe
/// the exact bind calls.
pub trait ParameterSink {
    /// Number of placeholders expecting a value.
    fn parameter_count(&self) -> usize;

    /// Binds `value` at the 1-based `index`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error for out-of-range indexes or values it
    /// refuses.
    fn bind_value(&mut self, index: usize, value: &Value) -> rusqlite::Result<()>;
}

impl ParameterSink for Statement<'_> {
    fn parameter_count(&self) -> usize {
        Statement::parameter_count(self)
    }

    fn bind_value(&mut self, index: usize, value: &Value) -> rusqlite::Result<()> {
        self.raw_bind_parameter(index, value)
    }
}

/// Binds `params[i]` at position `i + 1`, in order.
///
/// # Errors
///
/// - [`BindError::Type`] if any parameter cannot be classified; no bind
///   call has been made in that case.
/// - [`BindError::ParameterCount`] if the sequence length differs from the
///   statement's placeholder count.
/// - [`BindError::Native`] if the engine refuses a value.
pub fn bind<S>(sink: &mut S, params: &[Param]) -> Result<(), BindError>
where
    S: ParameterSink + ?Sized,
{
    let bound = classify_all(params)?;

    let expected = sink.parameter_count();
    if expected != bound.len() {
        return Err(BindError::ParameterCount {
            expected,
            given: bound.len(),
        });
    }

    for (i, param) in bound.iter().enumerate() {
        let index = i + 1;
        sink.bind_value(index, &param.value)
            .map_err(|source| BindError::Native { index, source })?;
    }
    Ok(())
}
