//! Value-level operator kernels, grouped by family. The evaluator
//! dispatches expression nodes here so that operator semantics live in one
//! place and stay exhaustively testable.

mod arithmetic;
mod compare;
mod logical;

pub use arithmetic::{add, divide, identity, multiply, negate, remainder, subtract};
pub use compare::{
    compare, equal, greater_than, greater_than_equal, less_than, less_than_equal, not_equal,
};
pub use logical::{and, not, or};
