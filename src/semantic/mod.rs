//! Semantic analysis: structural validation of the raw text and resolution
//! of column references against the frame schemas.

pub mod resolve;
pub mod validate;

pub use resolve::{resolve, Resolution, TableBinding};
pub use validate::{normalize, validate};
