//! Error surfaces: grammar violations, resolution failures, unknown
//! functions. Every error aborts the whole statement.

mod common;

use common::{assert_column, table_a, table_b};
use frameql::{Error, UpdateEngine};

fn execute_on_a(sql: &str) -> Error {
    let mut table = table_a();
    UpdateEngine::new()
        .execute(sql, &mut table, None)
        .unwrap_err()
}

#[test]
fn test_missing_update_alias() {
    let err = execute_on_a("update a_tbl set age=1 where id>3");
    assert_eq!(err, Error::Format("missing update alias".into()));
}

#[test]
fn test_missing_join_alias() {
    let mut a = table_a();
    let b = table_b();
    let err = UpdateEngine::new()
        .execute(
            "update a_tbl a set a.age=1 left join b_tbl on a.id=b.id where a.age>2",
            &mut a,
            Some(&b),
        )
        .unwrap_err();
    assert_eq!(err, Error::Format("missing join alias".into()));
}

#[test]
fn test_as_keyword_rejected() {
    let err = execute_on_a("update a_tbl as a set a.age=1 where a.id>3");
    assert_eq!(err, Error::Format("unexpected alias keyword".into()));
}

#[test]
fn test_unconditional_update_rejected() {
    let err = execute_on_a("update a_tbl a set a.age=a.id+a.score");
    assert_eq!(err, Error::Format("unconditional update not supported".into()));
}

#[test]
fn test_mixed_case_rejected() {
    let err = execute_on_a("UPDATE a_tbl a SET a.age=1 WHERE a.id>3");
    assert_eq!(err, Error::Format("mixed case not allowed".into()));
}

#[test]
fn test_bare_column_reference_rejected() {
    let err = execute_on_a("update a_tbl a set a.age=id+1 where a.id>3");
    assert_eq!(
        err,
        Error::Format(
            "column reference missing table alias: id is a column of the update table".into()
        )
    );
}

#[test]
fn test_like_rejected() {
    let err = execute_on_a("update a_tbl a set a.age=1 where a.id like 1");
    assert_eq!(err, Error::Format("like is not supported".into()));
}

#[test]
fn test_unknown_column_is_a_resolution_error() {
    let err = execute_on_a("update a_tbl a set a.salary=1 where a.id>3");
    assert_eq!(
        err,
        Error::Resolution("column salary not found in table a_tbl".into())
    );
}

#[test]
fn test_unknown_alias_is_a_resolution_error() {
    let err = execute_on_a("update a_tbl a set a.age=c.age where a.id>3");
    assert_eq!(err, Error::Resolution("unknown table alias in c.age".into()));
}

#[test]
fn test_join_without_second_table() {
    let err = execute_on_a(
        "update a_tbl a set a.age=b.age2 left join b_tbl b on a.id=b.id where a.id>3",
    );
    assert_eq!(
        err,
        Error::Resolution("statement joins b_tbl but no second table was provided".into())
    );
}

#[test]
fn test_disjunctive_on_predicate_rejected() {
    let mut a = table_a();
    let b = table_b();
    let err = UpdateEngine::new()
        .execute(
            "update a_tbl a set a.age=b.age2 left join b_tbl b on a.id=b.id or a.age=b.age2 \
             where a.id>0",
            &mut a,
            Some(&b),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[test]
fn test_non_equality_on_predicate_rejected() {
    let mut a = table_a();
    let b = table_b();
    let err = UpdateEngine::new()
        .execute(
            "update a_tbl a set a.age=b.age2 join b_tbl b on a.id>=b.id where a.id>0",
            &mut a,
            Some(&b),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[test]
fn test_set_through_join_alias_rejected() {
    let mut a = table_a();
    let b = table_b();
    let err = UpdateEngine::new()
        .execute(
            "update a_tbl a set b.age2=1 left join b_tbl b on a.id=b.id where a.id>0",
            &mut a,
            Some(&b),
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::Resolution("set target b.age2 must reference the update table".into())
    );
}

#[test]
fn test_unknown_function() {
    let err = execute_on_a("update a_tbl a set a.age=boost(a.age) where a.id>3");
    assert_eq!(err, Error::UnknownFunction("boost".into()));
}

#[test]
fn test_failed_statement_before_any_write_leaves_table_unchanged() {
    let mut table = table_a();
    let err = UpdateEngine::new()
        .execute(
            "update a_tbl a set a.age=boost(a.age) where a.id>=3",
            &mut table,
            None,
        )
        .unwrap_err();
    assert_eq!(err, Error::UnknownFunction("boost".into()));
    // The first masked row's evaluation failed, so nothing was written.
    assert_column(&table, "age", &[2, 3, 4, 5]);
}
