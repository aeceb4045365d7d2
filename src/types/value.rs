//! Runtime values stored in frame columns and produced by expression
//! evaluation.

use crate::error::{Error, Result};
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value.
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for integer and float values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    /// Numeric contents widened to f64, for cross-type comparison and
    /// arithmetic promotion.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Value::I64(i) => Ok(*i as f64),
            Value::F64(f) => Ok(*f),
            other => Err(Error::TypeMismatch {
                expected: "number".into(),
                found: other.data_type().to_string(),
            }),
        }
    }

    /// Truthiness for mask evaluation. Null is false, numbers are true when
    /// non-zero.
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            Value::I64(n) => Ok(*n != 0),
            Value::F64(n) => Ok(*n != 0.0 && !n.is_nan()),
            other => Err(Error::TypeMismatch {
                expected: "boolean".into(),
                found: other.data_type().to_string(),
            }),
        }
    }

    /// The data type this value inhabits. Null reports a nullable wrapper
    /// around the default integer type.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Nullable(Box::new(DataType::I64)),
            Value::Bool(_) => DataType::Bool,
            Value::I64(_) => DataType::I64,
            Value::F64(_) => DataType::F64,
            Value::Str(_) => DataType::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "'{}'", s),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::I64(i) => write!(f, "I64({})", i),
            Value::F64(v) => write!(f, "F64({})", v),
            Value::Str(s) => write!(f, "Str({})", s),
        }
    }
}

/// Equality by value, including bit-identical floats, so values can key
/// hash maps during joins. Cross-type numeric equality (3 == 3.0) is
/// intentional: join keys and IN lists mix integer and float columns.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::I64(l), Value::I64(r)) => l == r,
            (Value::F64(l), Value::F64(r)) => l.to_bits() == r.to_bits(),
            (Value::I64(l), Value::F64(r)) | (Value::F64(r), Value::I64(l)) => *l as f64 == *r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (_, _) => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Integers hash through their f64 bits under a shared numeric tag
        // so that 3 and 3.0 land in the same join-hash bucket, matching
        // PartialEq above.
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::I64(i) => {
                2u8.hash(state);
                (*i as f64).to_bits().hash(state);
            }
            Value::F64(f) => {
                2u8.hash(state);
                // Normalize -0.0 so it buckets with integer zero.
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state);
            }
            Value::Str(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}
