//! Statement parsing: lexer, AST, recursive-descent parser and the LRU
//! parse cache.

pub mod ast;
pub mod cache;
mod lexer;
mod parser;

pub use cache::CachingParser;
pub use lexer::{Keyword, Lexer, Token};
pub use parser::Parser;

use crate::error::Result;

/// Parses a statement string into an AST.
pub fn parse(sql: &str) -> Result<ast::UpdateStatement> {
    Parser::parse(sql)
}
