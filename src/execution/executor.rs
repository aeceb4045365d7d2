//! The update engine: compiles a statement and runs its three execution
//! phases against the frame.
//!
//! Phase 1 joins the second table in (if any), phase 2 applies the masked
//! assignments in source order, phase 3 strips the join-temporary columns.
//! Phases are strictly ordered and never re-entered. There is no partial
//! commit guarantee: an error mid-statement leaves the frame as-is at that
//! point, and callers own backing up state if they need atomicity.

use super::evaluate::evaluate;
use crate::error::Result;
use crate::frame::{hash_join, Frame};
use crate::functions::{Functions, ScalarFunction};
use crate::parsing::CachingParser;
use crate::planning::{plan_join, translate, UpdatePlan};
use crate::semantic::{normalize, resolve, validate};
use crate::types::DataType;
use tracing::info;

/// An advisory notice surfaced during execution. Drift after a join is
/// sometimes expected (e.g. an intentional fan-out), so these are reported,
/// not raised.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The join changed the working row count.
    RowCountDrift { before: usize, after: usize },
    /// A joined column's element type changed, e.g. from left-join padding.
    DtypeDrift {
        column: String,
        before: DataType,
        after: DataType,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::RowCountDrift { before, after } => {
                write!(f, "row count changed across join: {} -> {}", before, after)
            }
            Notice::DtypeDrift {
                column,
                before,
                after,
            } => write!(
                f,
                "column {} changed type across join: {} -> {}",
                column, before, after
            ),
        }
    }
}

/// What one statement did: rows matched by the mask, the post-join row
/// count (if a join ran), and any advisory notices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateOutcome {
    pub matched_rows: usize,
    pub joined_rows: Option<usize>,
    pub notices: Vec<Notice>,
}

/// Compiles and executes restricted UPDATE statements against frames. Owns
/// the caller-supplied scalar functions and an LRU parse cache; everything
/// else is per-call.
pub struct UpdateEngine {
    functions: Functions,
    parser: CachingParser,
}

impl UpdateEngine {
    pub fn new() -> Self {
        Self::with_functions(Functions::new())
    }

    pub fn with_functions(functions: Functions) -> Self {
        Self {
            functions,
            parser: CachingParser::new(),
        }
    }

    /// Registers a scalar function for use in SET expressions.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: impl ScalarFunction + 'static,
    ) -> &mut Self {
        self.functions.register(name, function);
        self
    }

    /// Compiles and executes one statement. `table` is mutated in place;
    /// `other` is the joined table, read-only, required exactly when the
    /// statement has a join clause.
    pub fn execute(
        &mut self,
        sql: &str,
        table: &mut Frame,
        other: Option<&Frame>,
    ) -> Result<UpdateOutcome> {
        // Compile: validate -> parse -> resolve -> plan -> translate.
        let sql = normalize(sql);
        let update_columns: Vec<String> = table.column_names().map(String::from).collect();
        let join_columns: Vec<String> = other
            .map(|f| f.column_names().map(String::from).collect())
            .unwrap_or_default();
        validate(&sql, &update_columns, &join_columns)?;

        let parsed = self.parser.parse(&sql)?;
        let statement = parsed.as_ref();
        let resolution = resolve(statement, table, other)?;
        let join_plan = plan_join(statement)?;
        let namespace = temp_namespace(table);
        let plan = translate(statement, &namespace)?;

        let mut outcome = UpdateOutcome::default();

        // Phase 1: join the referenced columns of the second table in under
        // the temporary namespace. The caller's frame is never touched; we
        // project what the statement references into a private frame first.
        if let (Some(join), Some(join_plan), Some(binding), Some(other)) =
            (&statement.join, &join_plan, &resolution.join, other)
        {
            let referenced: Vec<String> = binding.columns.iter().cloned().collect();
            let mut right = other.project(&referenced)?;
            for column in &referenced {
                right.rename_column(column, &format!("{}{}", namespace, column))?;
            }

            let left_on: Vec<String> = join_plan
                .left_keys
                .iter()
                .map(|key| key.column.clone())
                .collect();
            let right_on: Vec<String> = join_plan
                .right_keys
                .iter()
                .map(|key| format!("{}{}", namespace, key.column))
                .collect();

            let before = table.row_count();
            let joined = hash_join(table, &right, &left_on, &right_on, join.kind)?;
            let after = joined.row_count();

            if before != after {
                info!(before, after, "row count changed across join");
                outcome.notices.push(Notice::RowCountDrift { before, after });
            }
            for column in right.columns() {
                let joined_dtype = &joined.column(&column.name)?.dtype;
                if *joined_dtype != column.dtype {
                    // Report under the column's real name, not the
                    // temporary one.
                    let name = column
                        .name
                        .strip_prefix(&namespace)
                        .unwrap_or(&column.name);
                    info!(
                        column = name,
                        before = %column.dtype,
                        after = %joined_dtype,
                        "column changed type across join"
                    );
                    outcome.notices.push(Notice::DtypeDrift {
                        column: name.to_string(),
                        before: column.dtype.clone(),
                        after: joined_dtype.clone(),
                    });
                }
            }

            outcome.joined_rows = Some(after);
            *table = joined;
        }

        // Phase 2: evaluate the mask, then apply each assignment to masked
        // rows only, in source order, so later assignments observe earlier
        // writes.
        let mask = self.evaluate_mask(&plan, table)?;
        outcome.matched_rows = mask.iter().filter(|&&m| m).count();
        for assignment in &plan.assignments {
            for (row, _) in mask.iter().enumerate().filter(|(_, &m)| m) {
                let value = evaluate(&assignment.expr, table, row, &self.functions)?;
                table.set_value(row, &assignment.column, value)?;
            }
        }

        // Phase 3: strip every column under the temporary namespace,
        // whether or not a join happened.
        let temporary: Vec<String> = table
            .column_names()
            .filter(|name| name.starts_with(&namespace))
            .map(String::from)
            .collect();
        for column in &temporary {
            table.drop_column(column)?;
        }

        Ok(outcome)
    }

    /// Evaluates the mask expression for every row of the frame.
    fn evaluate_mask(&self, plan: &UpdatePlan, table: &Frame) -> Result<Vec<bool>> {
        (0..table.row_count())
            .map(|row| evaluate(&plan.mask, table, row, &self.functions)?.to_bool())
            .collect()
    }
}

impl Default for UpdateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks a per-statement namespace prefix for join-temporary columns: the
/// first `__jN_` no existing column starts with, so namespaced names can
/// never collide with real columns and cleanup can sweep exactly this
/// statement's temporaries.
fn temp_namespace(frame: &Frame) -> String {
    let mut n = 0;
    loop {
        let prefix = format!("__j{}_", n);
        if !frame.column_names().any(|name| name.starts_with(&prefix)) {
            return prefix;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&i| Value::I64(i)).collect()
    }

    #[test]
    fn test_temp_namespace_avoids_collisions() {
        let frame = Frame::from_columns(vec![("__j0_x", ints(&[1]))]).unwrap();
        assert_eq!(temp_namespace(&frame), "__j1_");

        let frame = Frame::from_columns(vec![("id", ints(&[1]))]).unwrap();
        assert_eq!(temp_namespace(&frame), "__j0_");
    }

    #[test]
    fn test_error_does_not_raise_for_drift() {
        // Fan-out: two right rows match one left row.
        let mut a = Frame::from_columns(vec![("id", ints(&[1])), ("x", ints(&[0]))]).unwrap();
        let b = Frame::from_columns(vec![("id", ints(&[1, 1])), ("y", ints(&[5, 6]))]).unwrap();
        let mut engine = UpdateEngine::new();
        let outcome = engine
            .execute(
                "update a_tbl a set a.x=b.y join b_tbl b on a.id=b.id where a.id=1",
                &mut a,
                Some(&b),
            )
            .unwrap();
        assert_eq!(outcome.joined_rows, Some(2));
        assert!(outcome
            .notices
            .iter()
            .any(|n| matches!(n, Notice::RowCountDrift { before: 1, after: 2 })));
    }
}
