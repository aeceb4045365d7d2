//! Tree-walking expression evaluation against one frame row.

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::functions::Functions;
use crate::operators;
use crate::types::{Expression, Value};

/// Evaluates an expression to a value, reading column references from the
/// given row of the frame and binding function calls against the registry.
pub fn evaluate(
    expr: &Expression,
    frame: &Frame,
    row: usize,
    functions: &Functions,
) -> Result<Value> {
    use Expression::*;
    Ok(match expr {
        Constant(value) => value.clone(),
        Column(name) => frame.value(row, name)?.clone(),

        // Logical operations
        And(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::and(&l, &r)?
        }
        Or(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::or(&l, &r)?
        }
        Not(inner) => {
            let v = evaluate(inner, frame, row, functions)?;
            operators::not(&v)?
        }

        // Comparison operations
        Equal(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::equal(&l, &r)?
        }
        NotEqual(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::not_equal(&l, &r)?
        }
        GreaterThan(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::greater_than(&l, &r)?
        }
        GreaterThanOrEqual(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::greater_than_equal(&l, &r)?
        }
        LessThan(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::less_than(&l, &r)?
        }
        LessThanOrEqual(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::less_than_equal(&l, &r)?
        }
        IsNull(inner, negated) => {
            let v = evaluate(inner, frame, row, functions)?;
            Value::Bool(v.is_null() != *negated)
        }

        // Arithmetic operations
        Add(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::add(&l, &r)?
        }
        Subtract(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::subtract(&l, &r)?
        }
        Multiply(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::multiply(&l, &r)?
        }
        Divide(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::divide(&l, &r)?
        }
        Remainder(lhs, rhs) => {
            let l = evaluate(lhs, frame, row, functions)?;
            let r = evaluate(rhs, frame, row, functions)?;
            operators::remainder(&l, &r)?
        }
        Negate(inner) => {
            let v = evaluate(inner, frame, row, functions)?;
            operators::negate(&v)?
        }
        Identity(inner) => {
            let v = evaluate(inner, frame, row, functions)?;
            operators::identity(&v)?
        }

        // Membership test. The probe value is a member when it equals any
        // non-null list element; a null probe is never a member. The
        // negation flag flips the boolean, so NOT IN is the exact per-row
        // complement of IN.
        InList(inner, list, negated) => {
            let value = evaluate(inner, frame, row, functions)?;
            let mut found = false;
            if !value.is_null() {
                for item in list {
                    let item = evaluate(item, frame, row, functions)?;
                    if !item.is_null() && item == value {
                        found = true;
                        break;
                    }
                }
            }
            Value::Bool(found != *negated)
        }

        // Function calls resolve against the caller-supplied registry.
        Function(name, args) => {
            let function = functions
                .get(name)
                .ok_or_else(|| Error::UnknownFunction(name.clone()))?;
            let args = args
                .iter()
                .map(|arg| evaluate(arg, frame, row, functions))
                .collect::<Result<Vec<_>>>()?;
            function.call(&args)?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Expression::*;

    fn test_frame() -> Frame {
        Frame::from_columns(vec![
            ("id", vec![Value::I64(1), Value::I64(2)]),
            ("age", vec![Value::I64(10), Value::Null]),
        ])
        .unwrap()
    }

    fn constant(i: i64) -> Box<Expression> {
        Box::new(Constant(Value::I64(i)))
    }

    fn column(name: &str) -> Box<Expression> {
        Box::new(Column(name.into()))
    }

    #[test]
    fn test_column_lookup() {
        let frame = test_frame();
        let functions = Functions::new();
        assert_eq!(
            evaluate(&Column("id".into()), &frame, 1, &functions).unwrap(),
            Value::I64(2)
        );
        assert!(evaluate(&Column("nope".into()), &frame, 0, &functions).is_err());
    }

    #[test]
    fn test_null_comparison_is_null() {
        let frame = test_frame();
        let functions = Functions::new();
        let expr = GreaterThan(column("age"), constant(5));
        assert_eq!(evaluate(&expr, &frame, 1, &functions).unwrap(), Value::Null);
    }

    #[test]
    fn test_in_list_and_complement() {
        let frame = test_frame();
        let functions = Functions::new();
        for row in 0..frame.row_count() {
            let positive = InList(column("age"), vec![*constant(10)], false);
            let negative = InList(column("age"), vec![*constant(10)], true);
            let p = evaluate(&positive, &frame, row, &functions).unwrap();
            let n = evaluate(&negative, &frame, row, &functions).unwrap();
            assert_eq!(operators::not(&p).unwrap(), n);
        }
    }

    #[test]
    fn test_is_null() {
        let frame = test_frame();
        let functions = Functions::new();
        let expr = IsNull(column("age"), false);
        assert_eq!(
            evaluate(&expr, &frame, 0, &functions).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            evaluate(&expr, &frame, 1, &functions).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unknown_function() {
        let frame = test_frame();
        let functions = Functions::new();
        let expr = Function("mystery".into(), vec![]);
        assert_eq!(
            evaluate(&expr, &frame, 0, &functions).unwrap_err(),
            Error::UnknownFunction("mystery".into())
        );
    }

    #[test]
    fn test_function_gets_row_scoped_args() {
        let frame = test_frame();
        let mut functions = Functions::new();
        functions.register("incr", |args: &[Value]| {
            operators::add(&args[0], &Value::I64(1))
        });
        let expr = Function("incr".into(), vec![*column("id")]);
        assert_eq!(
            evaluate(&expr, &frame, 1, &functions).unwrap(),
            Value::I64(3)
        );
    }
}
