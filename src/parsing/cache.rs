//! Caching wrapper around the statement parser.
//!
//! Parsing is a pure function of the statement text, so an LRU cache of
//! parsed statements avoids redundant work when the same statement is
//! executed repeatedly. Validation is not cached: it depends on the frame
//! schemas, which can change between calls.

use super::ast::UpdateStatement;
use crate::error::Result;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default capacity for the parse cache.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A caching wrapper around [`Parser`].
pub struct CachingParser {
    cache: LruCache<String, Arc<UpdateStatement>>,
}

impl CachingParser {
    /// Creates a caching parser with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a caching parser with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap());
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Parses normalized statement text, returning a cached AST when the
    /// same text was parsed before.
    pub fn parse(&mut self, sql: &str) -> Result<Arc<UpdateStatement>> {
        if let Some(statement) = self.cache.get(sql) {
            return Ok(statement.clone());
        }
        let statement = Arc::new(super::parse(sql)?);
        self.cache.put(sql.to_string(), statement.clone());
        Ok(statement)
    }

    /// Drops every cached statement.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for CachingParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_returns_same_ast() {
        let mut parser = CachingParser::with_capacity(2);
        let sql = "update t a set a.x=1 where a.x>0";
        let first = parser.parse(sql).unwrap();
        let second = parser.parse(sql).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut parser = CachingParser::new();
        assert!(parser.parse("update t set x=1").is_err());
        assert!(parser.parse("update t set x=1").is_err());
    }
}
