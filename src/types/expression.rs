//! Typed expressions produced by the translator and walked by the
//! evaluator.

use super::Value;
use std::fmt::Display;

/// An expression over frame rows, made up of nested operations and values.
/// Column references name storage columns on the (possibly joined) update
/// frame and are looked up per row during evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A constant value.
    Constant(Value),
    /// A storage column reference, resolved by name at evaluation time.
    Column(String),

    /// a AND b: logical AND of two booleans, three-valued.
    And(Box<Expression>, Box<Expression>),
    /// a OR b: logical OR of two booleans, three-valued.
    Or(Box<Expression>, Box<Expression>),
    /// NOT a: logical NOT of a boolean.
    Not(Box<Expression>),

    /// a = b: equality comparison.
    Equal(Box<Expression>, Box<Expression>),
    /// a <> b: not-equal comparison.
    NotEqual(Box<Expression>, Box<Expression>),
    /// a > b: greater-than comparison.
    GreaterThan(Box<Expression>, Box<Expression>),
    /// a >= b: greater-than-or-equal comparison.
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    /// a < b: less-than comparison.
    LessThan(Box<Expression>, Box<Expression>),
    /// a <= b: less-than-or-equal comparison.
    LessThanOrEqual(Box<Expression>, Box<Expression>),
    /// a IS NULL, or with the flag set, a IS NOT NULL. Always yields a
    /// boolean.
    IsNull(Box<Expression>, bool),

    /// a + b: adds two numbers.
    Add(Box<Expression>, Box<Expression>),
    /// a - b: subtracts two numbers.
    Subtract(Box<Expression>, Box<Expression>),
    /// a * b: multiplies two numbers.
    Multiply(Box<Expression>, Box<Expression>),
    /// a / b: divides two numbers, always producing a float.
    Divide(Box<Expression>, Box<Expression>),
    /// a % b: remainder of two numbers.
    Remainder(Box<Expression>, Box<Expression>),
    /// -a: negates a number.
    Negate(Box<Expression>),
    /// +a: the identity function, returns the same number.
    Identity(Box<Expression>),

    /// a IN (list), or with the flag set, a NOT IN (list). The negation
    /// applies to the membership result only, never to interior literals,
    /// and the test always yields a boolean so that NOT IN is the exact
    /// per-row complement of IN.
    InList(Box<Expression>, Vec<Expression>, bool),

    /// A call to a caller-supplied scalar function, by name, arguments in
    /// source order.
    Function(String, Vec<Expression>),
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Constant(value) => write!(f, "{}", value),
            Column(name) => write!(f, "{}", name),

            And(lhs, rhs) => write!(f, "({} and {})", lhs, rhs),
            Or(lhs, rhs) => write!(f, "({} or {})", lhs, rhs),
            Not(expr) => write!(f, "(not {})", expr),

            Equal(lhs, rhs) => write!(f, "({} = {})", lhs, rhs),
            NotEqual(lhs, rhs) => write!(f, "({} <> {})", lhs, rhs),
            GreaterThan(lhs, rhs) => write!(f, "({} > {})", lhs, rhs),
            GreaterThanOrEqual(lhs, rhs) => write!(f, "({} >= {})", lhs, rhs),
            LessThan(lhs, rhs) => write!(f, "({} < {})", lhs, rhs),
            LessThanOrEqual(lhs, rhs) => write!(f, "({} <= {})", lhs, rhs),
            IsNull(expr, negated) => {
                if *negated {
                    write!(f, "({} is not null)", expr)
                } else {
                    write!(f, "({} is null)", expr)
                }
            }

            Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Subtract(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Multiply(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Divide(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Remainder(lhs, rhs) => write!(f, "({} % {})", lhs, rhs),
            Negate(expr) => write!(f, "(-{})", expr),
            Identity(expr) => write!(f, "(+{})", expr),

            InList(expr, list, negated) => {
                write!(f, "({}", expr)?;
                if *negated {
                    write!(f, " not")?;
                }
                write!(f, " in (")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "))")
            }

            Function(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parenthesizes() {
        let expr = Expression::And(
            Box::new(Expression::GreaterThan(
                Box::new(Expression::Column("age".into())),
                Box::new(Expression::Constant(Value::I64(2))),
            )),
            Box::new(Expression::InList(
                Box::new(Expression::Column("id".into())),
                vec![
                    Expression::Constant(Value::I64(1)),
                    Expression::Constant(Value::I64(2)),
                ],
                true,
            )),
        );
        assert_eq!(expr.to_string(), "((age > 2) and (id not in (1, 2)))");
    }
}
