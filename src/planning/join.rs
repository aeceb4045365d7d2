//! Join planning.
//!
//! Derives ordered (left key, right key) column pairs from the ON
//! predicate. Only conjunctions of alias-qualified equalities are
//! supported; anything else fails fast rather than mis-planning the join.

use crate::error::{Error, Result};
use crate::parsing::ast::{ColumnRef, Expression, Operator, UpdateStatement};

/// The key pairs driving a join, positionally paired: `left_keys[i]` joins
/// to `right_keys[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan {
    pub left_keys: Vec<ColumnRef>,
    pub right_keys: Vec<ColumnRef>,
}

/// Builds the join plan for a statement, or `None` when it has no join.
pub fn plan_join(statement: &UpdateStatement) -> Result<Option<JoinPlan>> {
    let Some(join) = &statement.join else {
        return Ok(None);
    };

    let mut left_keys = Vec::new();
    let mut right_keys = Vec::new();
    for conjunct in conjuncts(&join.on) {
        let Expression::Operator(Operator::Equal(lhs, rhs)) = conjunct else {
            return Err(Error::Resolution(
                "on clause must be a conjunction of equality predicates".into(),
            ));
        };
        let (Expression::Column(lhs), Expression::Column(rhs)) = (&**lhs, &**rhs) else {
            return Err(Error::Resolution(
                "on predicates must compare a column of each table".into(),
            ));
        };
        let (left, right) = if lhs.alias == statement.alias && rhs.alias == join.alias {
            (lhs, rhs)
        } else if rhs.alias == statement.alias && lhs.alias == join.alias {
            (rhs, lhs)
        } else {
            return Err(Error::Resolution(format!(
                "on predicate {} = {} must pair one column of each table",
                lhs, rhs
            )));
        };
        left_keys.push(left.clone());
        right_keys.push(right.clone());
    }

    Ok(Some(JoinPlan {
        left_keys,
        right_keys,
    }))
}

/// Flattens a predicate over `and` into its conjuncts, in source order.
fn conjuncts(expr: &Expression) -> Vec<&Expression> {
    match expr {
        Expression::Operator(Operator::And(lhs, rhs)) => {
            let mut parts = conjuncts(lhs);
            parts.extend(conjuncts(rhs));
            parts
        }
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing;

    #[test]
    fn test_no_join_yields_empty_plan() {
        let stmt = parsing::parse("update t a set a.x=1 where a.x>0").unwrap();
        assert_eq!(plan_join(&stmt).unwrap(), None);
    }

    #[test]
    fn test_single_key() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y left join u b on a.id=b.id where a.x>0",
        )
        .unwrap();
        let plan = plan_join(&stmt).unwrap().unwrap();
        assert_eq!(plan.left_keys, vec![ColumnRef::new("a", "id")]);
        assert_eq!(plan.right_keys, vec![ColumnRef::new("b", "id")]);
    }

    #[test]
    fn test_multiple_keys_pair_positionally() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y join u b on a.id=b.id and b.grp=a.grp where a.x>0",
        )
        .unwrap();
        let plan = plan_join(&stmt).unwrap().unwrap();
        assert_eq!(
            plan.left_keys,
            vec![ColumnRef::new("a", "id"), ColumnRef::new("a", "grp")]
        );
        assert_eq!(
            plan.right_keys,
            vec![ColumnRef::new("b", "id"), ColumnRef::new("b", "grp")]
        );
    }

    #[test]
    fn test_disjunction_rejected() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y join u b on a.id=b.id or a.grp=b.grp where a.x>0",
        )
        .unwrap();
        assert!(matches!(
            plan_join(&stmt).unwrap_err(),
            Error::Resolution(_)
        ));
    }

    #[test]
    fn test_non_equality_rejected() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y join u b on a.id>b.id where a.x>0",
        )
        .unwrap();
        assert!(matches!(
            plan_join(&stmt).unwrap_err(),
            Error::Resolution(_)
        ));
    }

    #[test]
    fn test_same_table_both_sides_rejected() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y join u b on a.id=a.grp where a.x>0",
        )
        .unwrap();
        assert!(matches!(
            plan_join(&stmt).unwrap_err(),
            Error::Resolution(_)
        ));
    }

    #[test]
    fn test_literal_operand_rejected() {
        let stmt = parsing::parse(
            "update t a set a.x=b.y join u b on a.id=1 where a.x>0",
        )
        .unwrap();
        assert!(matches!(
            plan_join(&stmt).unwrap_err(),
            Error::Resolution(_)
        ));
    }
}
