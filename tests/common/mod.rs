//! Shared helpers for the integration tests.
#![allow(dead_code)]

use frameql::{Frame, Value};

/// Builds an integer value vector.
pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&i| Value::I64(i)).collect()
}

/// Builds a value vector where `None` is null and `Some(i)` an integer.
pub fn opt_ints(values: &[Option<i64>]) -> Vec<Value> {
    values
        .iter()
        .map(|v| v.map(Value::I64).unwrap_or(Value::Null))
        .collect()
}

/// The update-side table used across the tests:
/// `{id: [1,2,3,4], age: [2,3,4,5], score: [3,4,7,6]}`.
pub fn table_a() -> Frame {
    Frame::from_columns(vec![
        ("id", ints(&[1, 2, 3, 4])),
        ("age", ints(&[2, 3, 4, 5])),
        ("score", ints(&[3, 4, 7, 6])),
    ])
    .unwrap()
}

/// The join-side table: `{id: [1,2,3,4], age2: [3,4,5,6]}`.
pub fn table_b() -> Frame {
    Frame::from_columns(vec![
        ("id", ints(&[1, 2, 3, 4])),
        ("age2", ints(&[3, 4, 5, 6])),
    ])
    .unwrap()
}

/// Reads a whole column as values.
pub fn column(frame: &Frame, name: &str) -> Vec<Value> {
    (0..frame.row_count())
        .map(|row| frame.value(row, name).unwrap().clone())
        .collect()
}

/// Asserts a column holds exactly these integers.
pub fn assert_column(frame: &Frame, name: &str, expected: &[i64]) {
    assert_eq!(column(frame, name), ints(expected), "column {}", name);
}
