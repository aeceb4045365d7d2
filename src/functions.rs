//! Caller-supplied scalar functions usable inside SET expressions.

use crate::error::Result;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A named scalar function over row-scoped argument values. Implemented
/// for any matching closure, so callers can register plain functions:
///
/// ```
/// use frameql::{Error, Functions, Value};
///
/// let mut functions = Functions::new();
/// functions.register("add2", |args: &[Value]| match args {
///     [Value::I64(a)] => Ok(Value::I64(a + 2)),
///     _ => Err(Error::InvalidValue("add2 takes one integer".into())),
/// });
/// ```
pub trait ScalarFunction: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

impl<F> ScalarFunction for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

/// The registry of scalar functions available to one engine. Names are
/// matched exactly as written in the statement.
#[derive(Default, Clone)]
pub struct Functions {
    functions: HashMap<String, Arc<dyn ScalarFunction>>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under the given name, replacing any previous
    /// binding.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: impl ScalarFunction + 'static,
    ) -> &mut Self {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ScalarFunction>> {
        self.functions.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for Functions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("Functions").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_call() {
        let mut functions = Functions::new();
        functions.register("double", |args: &[Value]| {
            crate::operators::multiply(&args[0], &Value::I64(2))
        });
        let f = functions.get("double").unwrap();
        assert_eq!(f.call(&[Value::I64(21)]).unwrap(), Value::I64(42));
        assert!(functions.get("triple").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut functions = Functions::new();
        functions.register("f", |_: &[Value]| Ok(Value::I64(1)));
        functions.register("f", |_: &[Value]| Ok(Value::I64(2)));
        assert_eq!(
            functions.get("f").unwrap().call(&[]).unwrap(),
            Value::I64(2)
        );
    }
}
