//! Comparison operators. A null operand makes any comparison null;
//! otherwise values of comparable kinds produce a boolean.

use crate::error::{Error, Result};
use crate::types::Value;
use std::cmp::Ordering;

/// Orders two non-null values of comparable kinds. Numbers compare across
/// integer/float; strings and booleans compare within their own kind.
pub fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    use Value::*;
    match (left, right) {
        (I64(a), I64(b)) => Ok(a.cmp(b)),
        (a, b) if a.is_numeric() && b.is_numeric() => a
            .to_f64()?
            .partial_cmp(&b.to_f64()?)
            .ok_or_else(|| Error::InvalidValue("cannot order nan".into())),
        (Str(a), Str(b)) => Ok(a.cmp(b)),
        (Bool(a), Bool(b)) => Ok(a.cmp(b)),
        (a, b) => Err(Error::TypeMismatch {
            expected: a.data_type().to_string(),
            found: b.data_type().to_string(),
        }),
    }
}

fn comparison(
    left: &Value,
    right: &Value,
    test: impl Fn(Ordering) -> bool,
) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    Ok(Value::Bool(test(compare(left, right)?)))
}

pub fn equal(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o == Ordering::Equal)
}

pub fn not_equal(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o != Ordering::Equal)
}

pub fn greater_than(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o == Ordering::Greater)
}

pub fn greater_than_equal(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o != Ordering::Less)
}

pub fn less_than(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o == Ordering::Less)
}

pub fn less_than_equal(left: &Value, right: &Value) -> Result<Value> {
    comparison(left, right, |o| o != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Value::{Bool, Null, F64, I64};

    #[test]
    fn test_null_propagates() {
        assert_eq!(equal(&Null, &I64(1)).unwrap(), Null);
        assert_eq!(less_than(&I64(1), &Null).unwrap(), Null);
        assert_eq!(not_equal(&Null, &Null).unwrap(), Null);
    }

    #[test]
    fn test_cross_type_numeric_comparison() {
        assert_eq!(equal(&I64(3), &F64(3.0)).unwrap(), Bool(true));
        assert_eq!(less_than(&I64(3), &F64(3.5)).unwrap(), Bool(true));
        assert_eq!(greater_than_equal(&F64(4.0), &I64(4)).unwrap(), Bool(true));
    }

    #[test]
    fn test_string_comparison() {
        assert_eq!(
            less_than(&Value::Str("a".into()), &Value::Str("b".into())).unwrap(),
            Bool(true)
        );
    }

    #[test]
    fn test_incomparable_kinds_rejected() {
        assert!(equal(&I64(1), &Value::Str("1".into())).is_err());
        assert!(less_than(&Bool(true), &I64(1)).is_err());
    }

    #[test]
    fn test_not_equal() {
        assert_eq!(not_equal(&I64(1), &I64(2)).unwrap(), Bool(true));
        assert_eq!(not_equal(&I64(2), &I64(2)).unwrap(), Bool(false));
    }
}
