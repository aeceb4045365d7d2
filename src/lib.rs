//! A compiler from a restricted SQL UPDATE dialect to masked operations on
//! in-memory data frames.
//!
//! Statements take the form
//! `update <table> <alias> set <assignments> [[left] join <table> <alias>
//! on <keys>] where <predicate>` and run against [`Frame`] values through
//! an [`UpdateEngine`]:
//!
//! ```
//! use frameql::{Frame, UpdateEngine, Value};
//!
//! let mut table = Frame::from_columns(vec![
//!     ("id", vec![Value::I64(1), Value::I64(2), Value::I64(3), Value::I64(4)]),
//!     ("age", vec![Value::I64(2), Value::I64(3), Value::I64(4), Value::I64(5)]),
//! ])
//! .unwrap();
//!
//! let mut engine = UpdateEngine::new();
//! engine
//!     .execute("update a_tbl a set a.age=a.id*2 where a.id>=3", &mut table, None)
//!     .unwrap();
//!
//! assert_eq!(*table.value(2, "age").unwrap(), Value::I64(6));
//! ```
//!
//! The pipeline is validate -> parse -> resolve -> plan -> translate ->
//! execute; each stage consumes the previous one's output. The compile
//! stages are pure; execution mutates the update frame in place and
//! assumes exclusive access for the duration of one call.

mod error;
mod execution;
mod frame;
mod functions;
mod operators;
mod parsing;
mod planning;
mod semantic;
mod types;

pub use error::{Error, Result};
pub use execution::{Notice, UpdateEngine, UpdateOutcome};
pub use frame::{Column, Frame};
pub use functions::{Functions, ScalarFunction};
pub use types::{DataType, JoinKind, Value};
