//! Lowers the source AST into typed, resolved expressions.
//!
//! The WHERE predicate becomes a mask expression and the SET clause an
//! ordered assignment list. Alias-qualified references resolve into storage
//! column names on the update frame: update-alias references keep their
//! column name, join-alias references take the statement's temporary
//! namespace, since after the join phase both live on a single frame.

use crate::error::{Error, Result};
use crate::parsing::ast::{self, ColumnRef, UpdateStatement};
use crate::types::{Expression, Value};

/// One `target = expression` pair, resolved to storage columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The storage column written to, always on the update table.
    pub column: String,
    /// The value expression, evaluated per masked row.
    pub expr: Expression,
}

/// The translated statement: a row mask and the ordered assignments to
/// apply under it. Order matters: a later assignment reads values an
/// earlier one wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
    pub mask: Expression,
    pub assignments: Vec<Assignment>,
}

/// Translates a statement, resolving join-alias references under the given
/// temporary namespace.
pub fn translate(statement: &UpdateStatement, namespace: &str) -> Result<UpdatePlan> {
    let translator = Translator {
        statement,
        namespace,
    };

    let mask = translator.expression(&statement.where_clause)?;

    let mut assignments = Vec::with_capacity(statement.set.len());
    for (target, expr) in &statement.set {
        if target.alias != statement.alias {
            return Err(Error::Resolution(format!(
                "set target {} must reference the update table",
                target
            )));
        }
        assignments.push(Assignment {
            column: target.column.clone(),
            expr: translator.expression(expr)?,
        });
    }

    Ok(UpdatePlan { mask, assignments })
}

struct Translator<'a> {
    statement: &'a UpdateStatement,
    namespace: &'a str,
}

impl Translator<'_> {
    /// Resolves an alias-qualified reference to its storage column on the
    /// (possibly joined) update frame.
    fn column(&self, reference: &ColumnRef) -> Result<String> {
        if reference.alias == self.statement.alias {
            return Ok(reference.column.clone());
        }
        if let Some(join) = &self.statement.join {
            if reference.alias == join.alias {
                return Ok(format!("{}{}", self.namespace, reference.column));
            }
        }
        // The resolver reports this first; keep the translator defensive.
        Err(Error::Resolution(format!(
            "unknown table alias in {}",
            reference
        )))
    }

    fn expression(&self, expr: &ast::Expression) -> Result<Expression> {
        use ast::Operator::*;
        Ok(match expr {
            ast::Expression::Column(reference) => Expression::Column(self.column(reference)?),
            ast::Expression::Literal(literal) => Expression::Constant(match literal {
                ast::Literal::Null => Value::Null,
                ast::Literal::Boolean(b) => Value::Bool(*b),
                ast::Literal::Integer(i) => Value::I64(*i),
                ast::Literal::Float(f) => Value::F64(*f),
                ast::Literal::String(s) => Value::Str(s.clone()),
            }),
            ast::Expression::Function(name, args) => Expression::Function(
                name.clone(),
                args.iter()
                    .map(|arg| self.expression(arg))
                    .collect::<Result<_>>()?,
            ),
            ast::Expression::Operator(operator) => match operator {
                And(lhs, rhs) => Expression::And(self.boxed(lhs)?, self.boxed(rhs)?),
                Or(lhs, rhs) => Expression::Or(self.boxed(lhs)?, self.boxed(rhs)?),
                Not(inner) => Expression::Not(self.boxed(inner)?),

                Equal(lhs, rhs) => Expression::Equal(self.boxed(lhs)?, self.boxed(rhs)?),
                NotEqual(lhs, rhs) => Expression::NotEqual(self.boxed(lhs)?, self.boxed(rhs)?),
                GreaterThan(lhs, rhs) => {
                    Expression::GreaterThan(self.boxed(lhs)?, self.boxed(rhs)?)
                }
                GreaterThanOrEqual(lhs, rhs) => {
                    Expression::GreaterThanOrEqual(self.boxed(lhs)?, self.boxed(rhs)?)
                }
                LessThan(lhs, rhs) => Expression::LessThan(self.boxed(lhs)?, self.boxed(rhs)?),
                LessThanOrEqual(lhs, rhs) => {
                    Expression::LessThanOrEqual(self.boxed(lhs)?, self.boxed(rhs)?)
                }
                IsNull(inner, negated) => Expression::IsNull(self.boxed(inner)?, *negated),

                Add(lhs, rhs) => Expression::Add(self.boxed(lhs)?, self.boxed(rhs)?),
                Subtract(lhs, rhs) => Expression::Subtract(self.boxed(lhs)?, self.boxed(rhs)?),
                Multiply(lhs, rhs) => Expression::Multiply(self.boxed(lhs)?, self.boxed(rhs)?),
                Divide(lhs, rhs) => Expression::Divide(self.boxed(lhs)?, self.boxed(rhs)?),
                Remainder(lhs, rhs) => Expression::Remainder(self.boxed(lhs)?, self.boxed(rhs)?),
                Negate(inner) => Expression::Negate(self.boxed(inner)?),
                Identity(inner) => Expression::Identity(self.boxed(inner)?),

                InList {
                    expr: inner,
                    list,
                    negated,
                } => Expression::InList(
                    self.boxed(inner)?,
                    list.iter()
                        .map(|item| self.expression(item))
                        .collect::<Result<_>>()?,
                    *negated,
                ),
            },
        })
    }

    fn boxed(&self, expr: &ast::Expression) -> Result<Box<Expression>> {
        Ok(Box::new(self.expression(expr)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing;

    fn translate_sql(sql: &str) -> Result<UpdatePlan> {
        translate(&parsing::parse(sql).unwrap(), "__j0_")
    }

    #[test]
    fn test_update_alias_resolves_to_storage_column() {
        let plan = translate_sql("update t a set a.age=a.id*2 where a.id>=3").unwrap();
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].column, "age");
        assert_eq!(plan.mask.to_string(), "(id >= 3)");
        assert_eq!(plan.assignments[0].expr.to_string(), "(id * 2)");
    }

    #[test]
    fn test_join_alias_resolves_under_namespace() {
        let plan = translate_sql(
            "update t a set a.age=a.id+b.age2+1 left join u b on a.id=b.id \
             where a.age>2 and b.age2<6",
        )
        .unwrap();
        assert_eq!(
            plan.mask.to_string(),
            "((age > 2) and (__j0_age2 < 6))"
        );
        assert_eq!(
            plan.assignments[0].expr.to_string(),
            "((id + __j0_age2) + 1)"
        );
    }

    #[test]
    fn test_set_through_join_alias_rejected() {
        let err = translate_sql(
            "update t a set b.age2=1 left join u b on a.id=b.id where a.id>0",
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::Resolution("set target b.age2 must reference the update table".into())
        );
    }

    #[test]
    fn test_not_in_keeps_negation_outside_list() {
        let plan = translate_sql("update t a set a.x=1 where a.id not in (1, -2)").unwrap();
        assert_eq!(plan.mask.to_string(), "(id not in (1, (-2)))");
    }

    #[test]
    fn test_assignments_keep_source_order() {
        let plan = translate_sql("update t a set a.x=a.x+1, a.y=a.x where a.x>0").unwrap();
        let columns: Vec<_> = plan.assignments.iter().map(|a| a.column.as_str()).collect();
        assert_eq!(columns, vec!["x", "y"]);
    }
}
