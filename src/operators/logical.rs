//! Logical operators with SQL three-valued semantics.

use crate::error::{Error, Result};
use crate::types::Value;

fn not_boolean(left: &Value, right: &Value) -> Error {
    Error::TypeMismatch {
        expected: "boolean".into(),
        found: format!("{:?} and {:?}", left, right),
    }
}

/// Three-valued AND: false dominates, null is unknown.
pub fn and(left: &Value, right: &Value) -> Result<Value> {
    use Value::*;
    match (left, right) {
        // If either is false, the result is false.
        (Bool(false), _) | (_, Bool(false)) => Ok(Bool(false)),
        (Bool(true), Bool(true)) => Ok(Bool(true)),
        (Bool(true), Null) | (Null, Bool(true)) => Ok(Null),
        (Null, Null) => Ok(Null),
        _ => Err(not_boolean(left, right)),
    }
}

/// Three-valued OR: true dominates, null is unknown.
pub fn or(left: &Value, right: &Value) -> Result<Value> {
    use Value::*;
    match (left, right) {
        // If either is true, the result is true.
        (Bool(true), _) | (_, Bool(true)) => Ok(Bool(true)),
        (Bool(false), Bool(false)) => Ok(Bool(false)),
        (Bool(false), Null) | (Null, Bool(false)) => Ok(Null),
        (Null, Null) => Ok(Null),
        _ => Err(not_boolean(left, right)),
    }
}

/// Three-valued NOT: null stays null.
pub fn not(value: &Value) -> Result<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Null => Ok(Value::Null),
        other => Err(Error::TypeMismatch {
            expected: "boolean".into(),
            found: other.data_type().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Value::{Bool, Null};

    #[test]
    fn test_and_truth_table() {
        assert_eq!(and(&Bool(true), &Bool(true)).unwrap(), Bool(true));
        assert_eq!(and(&Bool(true), &Bool(false)).unwrap(), Bool(false));
        assert_eq!(and(&Bool(false), &Null).unwrap(), Bool(false));
        assert_eq!(and(&Null, &Bool(false)).unwrap(), Bool(false));
        assert_eq!(and(&Bool(true), &Null).unwrap(), Null);
        assert_eq!(and(&Null, &Null).unwrap(), Null);
    }

    #[test]
    fn test_or_truth_table() {
        assert_eq!(or(&Bool(false), &Bool(false)).unwrap(), Bool(false));
        assert_eq!(or(&Bool(true), &Null).unwrap(), Bool(true));
        assert_eq!(or(&Null, &Bool(true)).unwrap(), Bool(true));
        assert_eq!(or(&Bool(false), &Null).unwrap(), Null);
        assert_eq!(or(&Null, &Null).unwrap(), Null);
    }

    #[test]
    fn test_not() {
        assert_eq!(not(&Bool(true)).unwrap(), Bool(false));
        assert_eq!(not(&Null).unwrap(), Null);
        assert!(not(&Value::I64(1)).is_err());
    }

    #[test]
    fn test_non_boolean_rejected() {
        assert!(and(&Value::I64(1), &Bool(true)).is_err());
        assert!(or(&Bool(false), &Value::Str("x".into())).is_err());
    }
}
