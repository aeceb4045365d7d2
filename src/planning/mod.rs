//! Planning: join-key derivation from the ON predicate, and translation of
//! the WHERE and SET clauses into typed, resolved expressions.

pub mod join;
pub mod translate;

pub use join::{plan_join, JoinPlan};
pub use translate::{translate, Assignment, UpdatePlan};
