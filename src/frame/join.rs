//! Hash join between two frames.
//!
//! Builds a hash table over the right frame keyed on the join columns, then
//! probes it with each left row in order. Left row order is preserved in the
//! output; a left row matching several right rows fans out into several
//! output rows.

use super::{Column, Frame};
use crate::error::Result;
use crate::types::{JoinKind, Value};
use std::collections::HashMap;

/// Joins `left` against `right` on positional key-column pairs. `Inner`
/// drops left rows without a match; `Left` keeps every left row, padding
/// the right columns with nulls. Column names of the two frames must not
/// collide (the executor namespaces the right frame beforehand).
pub fn hash_join(
    left: &Frame,
    right: &Frame,
    left_on: &[String],
    right_on: &[String],
    kind: JoinKind,
) -> Result<Frame> {
    debug_assert_eq!(left_on.len(), right_on.len());

    // Build the hash table over the right rows. Keys containing nulls never
    // match anything and are left out.
    let right_keys: Vec<&Column> = right_on
        .iter()
        .map(|name| right.column(name))
        .collect::<Result<_>>()?;
    let mut table: HashMap<Vec<Value>, Vec<usize>> = HashMap::new();
    for row in 0..right.row_count() {
        let key: Vec<Value> = right_keys.iter().map(|c| c.values[row].clone()).collect();
        if key.iter().any(|v| v.is_null()) {
            continue;
        }
        table.entry(key).or_default().push(row);
    }

    // Probe with each left row, collecting (left row, matched right row)
    // pairs; None marks a null-padded right side.
    let left_keys: Vec<&Column> = left_on
        .iter()
        .map(|name| left.column(name))
        .collect::<Result<_>>()?;
    let mut pairs: Vec<(usize, Option<usize>)> = Vec::with_capacity(left.row_count());
    for row in 0..left.row_count() {
        let key: Vec<Value> = left_keys.iter().map(|c| c.values[row].clone()).collect();
        let matches = if key.iter().any(|v| v.is_null()) {
            None
        } else {
            table.get(&key)
        };
        match matches {
            Some(rows) => pairs.extend(rows.iter().map(|&r| (row, Some(r)))),
            None => {
                if kind == JoinKind::Left {
                    pairs.push((row, None));
                }
            }
        }
    }

    // Materialize the output: left columns first, then right columns. Right
    // column types widen to nullable when any padding happened.
    let padded = pairs.iter().any(|(_, r)| r.is_none());
    let mut joined = Frame::new();
    for column in left.columns() {
        let values = pairs.iter().map(|&(l, _)| column.values[l].clone()).collect();
        joined.push_column(Column {
            name: column.name.clone(),
            dtype: column.dtype.clone(),
            values,
        })?;
    }
    for column in right.columns() {
        let values = pairs
            .iter()
            .map(|&(_, r)| match r {
                Some(r) => column.values[r].clone(),
                None => Value::Null,
            })
            .collect();
        let dtype = if padded {
            column.dtype.clone().into_nullable()
        } else {
            column.dtype.clone()
        };
        joined.push_column(Column {
            name: column.name.clone(),
            dtype,
            values,
        })?;
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&i| Value::I64(i)).collect()
    }

    fn frame(columns: Vec<(&str, Vec<Value>)>) -> Frame {
        Frame::from_columns(columns).unwrap()
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let left = frame(vec![("id", ints(&[1, 2, 3]))]);
        let right = frame(vec![("r_id", ints(&[1, 3])), ("r_v", ints(&[10, 30]))]);
        let joined = hash_join(
            &left,
            &right,
            &["id".to_string()],
            &["r_id".to_string()],
            JoinKind::Inner,
        )
        .unwrap();
        assert_eq!(joined.row_count(), 2);
        assert_eq!(*joined.value(0, "r_v").unwrap(), Value::I64(10));
        assert_eq!(*joined.value(1, "r_v").unwrap(), Value::I64(30));
    }

    #[test]
    fn test_left_join_pads_with_nulls() {
        let left = frame(vec![("id", ints(&[1, 2]))]);
        let right = frame(vec![("r_id", ints(&[1])), ("r_v", ints(&[10]))]);
        let joined = hash_join(
            &left,
            &right,
            &["id".to_string()],
            &["r_id".to_string()],
            JoinKind::Left,
        )
        .unwrap();
        assert_eq!(joined.row_count(), 2);
        assert_eq!(*joined.value(1, "r_v").unwrap(), Value::Null);
        // Padding widens the right column types.
        assert_eq!(
            joined.column("r_v").unwrap().dtype,
            DataType::Nullable(Box::new(DataType::I64))
        );
    }

    #[test]
    fn test_fan_out_duplicates_left_rows() {
        let left = frame(vec![("id", ints(&[1]))]);
        let right = frame(vec![("r_id", ints(&[1, 1])), ("r_v", ints(&[10, 20]))]);
        let joined = hash_join(
            &left,
            &right,
            &["id".to_string()],
            &["r_id".to_string()],
            JoinKind::Inner,
        )
        .unwrap();
        assert_eq!(joined.row_count(), 2);
    }

    #[test]
    fn test_null_keys_never_match() {
        let left = frame(vec![("id", vec![Value::Null, Value::I64(1)])]);
        let right = frame(vec![("r_id", vec![Value::Null, Value::I64(1)])]);
        let joined = hash_join(
            &left,
            &right,
            &["id".to_string()],
            &["r_id".to_string()],
            JoinKind::Left,
        )
        .unwrap();
        assert_eq!(joined.row_count(), 2);
        assert_eq!(*joined.value(0, "r_id").unwrap(), Value::Null);
        assert_eq!(*joined.value(1, "r_id").unwrap(), Value::I64(1));
    }

    #[test]
    fn test_multi_key_join() {
        let left = frame(vec![("x", ints(&[1, 1])), ("y", ints(&[1, 2]))]);
        let right = frame(vec![
            ("rx", ints(&[1, 1])),
            ("ry", ints(&[2, 3])),
            ("rv", ints(&[20, 30])),
        ]);
        let joined = hash_join(
            &left,
            &right,
            &["x".to_string(), "y".to_string()],
            &["rx".to_string(), "ry".to_string()],
            JoinKind::Inner,
        )
        .unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(*joined.value(0, "rv").unwrap(), Value::I64(20));
    }

    #[test]
    fn test_left_row_order_preserved() {
        let left = frame(vec![("id", ints(&[3, 1, 2]))]);
        let right = frame(vec![("r_id", ints(&[1, 2, 3]))]);
        let joined = hash_join(
            &left,
            &right,
            &["id".to_string()],
            &["r_id".to_string()],
            JoinKind::Inner,
        )
        .unwrap();
        let ids: Vec<_> = (0..3).map(|r| joined.value(r, "id").unwrap().clone()).collect();
        assert_eq!(ids, vec![Value::I64(3), Value::I64(1), Value::I64(2)]);
    }
}
