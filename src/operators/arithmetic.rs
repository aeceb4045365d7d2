//! Arithmetic operators. A null operand propagates null; mixed
//! integer/float promotes to float; division always produces a float.

use crate::error::{Error, Result};
use crate::types::Value;

fn not_numeric(value: &Value) -> Error {
    Error::TypeMismatch {
        expected: "number".into(),
        found: value.data_type().to_string(),
    }
}

fn check_numeric<'a>(left: &'a Value, right: &'a Value) -> Result<Option<(&'a Value, &'a Value)>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    if !left.is_numeric() {
        return Err(not_numeric(left));
    }
    if !right.is_numeric() {
        return Err(not_numeric(right));
    }
    Ok(Some((left, right)))
}

pub fn add(left: &Value, right: &Value) -> Result<Value> {
    match check_numeric(left, right)? {
        None => Ok(Value::Null),
        Some((Value::I64(a), Value::I64(b))) => a
            .checked_add(*b)
            .map(Value::I64)
            .ok_or_else(|| Error::InvalidValue(format!("integer overflow: {} + {}", a, b))),
        Some((a, b)) => Ok(Value::F64(a.to_f64()? + b.to_f64()?)),
    }
}

pub fn subtract(left: &Value, right: &Value) -> Result<Value> {
    match check_numeric(left, right)? {
        None => Ok(Value::Null),
        Some((Value::I64(a), Value::I64(b))) => a
            .checked_sub(*b)
            .map(Value::I64)
            .ok_or_else(|| Error::InvalidValue(format!("integer overflow: {} - {}", a, b))),
        Some((a, b)) => Ok(Value::F64(a.to_f64()? - b.to_f64()?)),
    }
}

pub fn multiply(left: &Value, right: &Value) -> Result<Value> {
    match check_numeric(left, right)? {
        None => Ok(Value::Null),
        Some((Value::I64(a), Value::I64(b))) => a
            .checked_mul(*b)
            .map(Value::I64)
            .ok_or_else(|| Error::InvalidValue(format!("integer overflow: {} * {}", a, b))),
        Some((a, b)) => Ok(Value::F64(a.to_f64()? * b.to_f64()?)),
    }
}

/// Division always promotes to float, so 3 / 2 is 1.5. Float division by
/// zero follows IEEE and yields an infinity or nan.
pub fn divide(left: &Value, right: &Value) -> Result<Value> {
    match check_numeric(left, right)? {
        None => Ok(Value::Null),
        Some((a, b)) => Ok(Value::F64(a.to_f64()? / b.to_f64()?)),
    }
}

pub fn remainder(left: &Value, right: &Value) -> Result<Value> {
    match check_numeric(left, right)? {
        None => Ok(Value::Null),
        Some((Value::I64(a), Value::I64(b))) => {
            if *b == 0 {
                return Err(Error::InvalidValue("division by zero".into()));
            }
            a.checked_rem(*b)
                .map(Value::I64)
                .ok_or_else(|| Error::InvalidValue(format!("integer overflow: {} % {}", a, b)))
        }
        Some((a, b)) => Ok(Value::F64(a.to_f64()? % b.to_f64()?)),
    }
}

pub fn negate(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::I64(i) => i
            .checked_neg()
            .map(Value::I64)
            .ok_or_else(|| Error::InvalidValue(format!("integer overflow: -{}", i))),
        Value::F64(f) => Ok(Value::F64(-f)),
        other => Err(not_numeric(other)),
    }
}

pub fn identity(value: &Value) -> Result<Value> {
    match value {
        Value::Null | Value::I64(_) | Value::F64(_) => Ok(value.clone()),
        other => Err(not_numeric(other)),
    }
}
