//! Column-reference resolution.
//!
//! Collects every alias-qualified reference in the statement, partitions
//! the set by the two declared aliases, and checks each referenced column
//! against the corresponding frame's schema.

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::parsing::ast::{ColumnRef, UpdateStatement};
use std::collections::BTreeSet;

/// A table bound into the statement: its name, its alias, and the set of
/// its columns the statement references.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBinding {
    pub table: String,
    pub alias: String,
    pub columns: BTreeSet<String>,
}

/// The resolved reference sets for one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub update: TableBinding,
    pub join: Option<TableBinding>,
}

/// Resolves every column reference in the statement against the provided
/// frames. Fails when an alias is not one of the two declared aliases, when
/// a referenced column does not exist, or when the statement joins a table
/// the caller did not supply.
pub fn resolve(
    statement: &UpdateStatement,
    update_frame: &Frame,
    join_frame: Option<&Frame>,
) -> Result<Resolution> {
    if let Some(join) = &statement.join {
        if join.alias == statement.alias {
            return Err(Error::Resolution(format!(
                "duplicate table alias {}",
                join.alias
            )));
        }
        if join_frame.is_none() {
            return Err(Error::Resolution(format!(
                "statement joins {} but no second table was provided",
                join.table
            )));
        }
    }

    let mut update_columns = BTreeSet::new();
    let mut join_columns = BTreeSet::new();
    for reference in collect_references(statement) {
        if reference.alias == statement.alias {
            update_columns.insert(reference.column);
        } else if let Some(join) = &statement.join {
            if reference.alias == join.alias {
                join_columns.insert(reference.column);
            } else {
                return Err(Error::Resolution(format!(
                    "unknown table alias in {}",
                    reference
                )));
            }
        } else {
            return Err(Error::Resolution(format!(
                "unknown table alias in {}",
                reference
            )));
        }
    }

    for column in &update_columns {
        if !update_frame.has_column(column) {
            return Err(Error::Resolution(format!(
                "column {} not found in table {}",
                column, statement.table
            )));
        }
    }
    let join = match (&statement.join, join_frame) {
        (Some(join), Some(frame)) => {
            for column in &join_columns {
                if !frame.has_column(column) {
                    return Err(Error::Resolution(format!(
                        "column {} not found in table {}",
                        column, join.table
                    )));
                }
            }
            Some(TableBinding {
                table: join.table.clone(),
                alias: join.alias.clone(),
                columns: join_columns,
            })
        }
        _ => None,
    };

    Ok(Resolution {
        update: TableBinding {
            table: statement.table.clone(),
            alias: statement.alias.clone(),
            columns: update_columns,
        },
        join,
    })
}

/// Every alias-qualified reference in the statement: SET targets, SET
/// expressions, the ON predicate and the WHERE predicate.
fn collect_references(statement: &UpdateStatement) -> Vec<ColumnRef> {
    let mut references = Vec::new();
    for (target, expr) in &statement.set {
        references.push(target.clone());
        collect_expression(expr, &mut references);
    }
    if let Some(join) = &statement.join {
        collect_expression(&join.on, &mut references);
    }
    collect_expression(&statement.where_clause, &mut references);
    references
}

fn collect_expression(expr: &crate::parsing::ast::Expression, out: &mut Vec<ColumnRef>) {
    expr.walk(&mut |expr| {
        if let crate::parsing::ast::Expression::Column(reference) = expr {
            out.push(reference.clone());
        }
    });
}
