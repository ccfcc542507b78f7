//! Cell values held by a [`RecordSet`](crate::RecordSet)

use std::fmt;

/// Tokens a tabular export uses to mean "no value".
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A",
];

/// A single cell value
///
/// Sources differ in how much typing they carry: the nested API export is
/// typed by its document, the flat export is inferred per column, and the
/// ledger is all text until validation coerces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
}

impl Value {
    /// Build a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true for [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true when the cell carries no usable content: null, or
    /// text that is empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Float(f) => f.is_nan(),
            Value::Int(_) => false,
        }
    }

    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a finite float.
    ///
    /// Text is trimmed and parsed; anything that is not a finite number
    /// yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Value::Null => return None,
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Parse one raw field from a delimited export into a typed value.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NULL_TOKENS.contains(&trimmed) {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Infer a whole column at once.
    ///
    /// A column is integer only if every non-null cell is an integer, float
    /// if every non-null cell is numeric, and text otherwise. Text columns
    /// keep the raw strings of every non-null cell so nothing is reformatted.
    pub fn infer_column(raw: &[&str]) -> Vec<Value> {
        let inferred: Vec<Value> = raw.iter().map(|r| Value::infer(r)).collect();

        let all_numeric = inferred
            .iter()
            .all(|v| matches!(v, Value::Null | Value::Int(_) | Value::Float(_)));
        if !all_numeric {
            return raw
                .iter()
                .zip(inferred)
                .map(|(r, v)| if v.is_null() { v } else { Value::text(*r) })
                .collect();
        }

        let any_float = inferred.iter().any(|v| matches!(v, Value::Float(_)));
        if !any_float {
            return inferred;
        }
        inferred
            .into_iter()
            .map(|v| match v {
                Value::Int(i) => Value::Float(i as f64),
                other => other,
            })
            .collect()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
