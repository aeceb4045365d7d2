//! Column element types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared element type of a frame column. `Nullable` wraps the
/// element type of a column that has absorbed nulls, e.g. from left-join
/// padding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    I64,
    F64,
    Str,
    Nullable(Box<DataType>),
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        match self {
            DataType::I64 | DataType::F64 => true,
            DataType::Nullable(inner) => inner.is_numeric(),
            _ => false,
        }
    }

    /// Strip the nullable wrapper, if any.
    pub fn inner(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.inner(),
            other => other,
        }
    }

    /// Wrap in `Nullable` unless already wrapped.
    pub fn into_nullable(self) -> DataType {
        match self {
            DataType::Nullable(_) => self,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    /// The narrowest type covering both operands, used when a masked write
    /// stores a value into an existing column. Mixed numeric widens to
    /// float; any null involvement widens to nullable.
    pub fn unify(&self, other: &DataType) -> Option<DataType> {
        let nullable =
            matches!(self, DataType::Nullable(_)) || matches!(other, DataType::Nullable(_));
        let base = match (self.inner(), other.inner()) {
            (a, b) if a == b => a.clone(),
            (DataType::I64, DataType::F64) | (DataType::F64, DataType::I64) => DataType::F64,
            _ => return None,
        };
        Some(if nullable { base.into_nullable() } else { base })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::I64 => write!(f, "BIGINT"),
            DataType::F64 => write!(f, "DOUBLE"),
            DataType::Str => write!(f, "TEXT"),
            DataType::Nullable(inner) => write!(f, "{} NULL", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify() {
        assert_eq!(DataType::I64.unify(&DataType::I64), Some(DataType::I64));
        assert_eq!(DataType::I64.unify(&DataType::F64), Some(DataType::F64));
        assert_eq!(
            DataType::I64.unify(&DataType::Nullable(Box::new(DataType::I64))),
            Some(DataType::Nullable(Box::new(DataType::I64)))
        );
        assert_eq!(DataType::Str.unify(&DataType::I64), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::I64.to_string(), "BIGINT");
        assert_eq!(
            DataType::Nullable(Box::new(DataType::F64)).to_string(),
            "DOUBLE NULL"
        );
    }
}
