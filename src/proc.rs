//! Procedures passed to records as blocks and predicates.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{exceptions::Condition, value::Value};

type ProcFn = dyn Fn(&[Value]) -> Result<Value, Condition> + Send + Sync;

/// A callable value. Two procedures are equal only if they are the same
/// closure.
#[derive(Clone)]
pub struct Procedure(Arc<ProcFn>);

impl Procedure {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Condition> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// Wrap a one-argument predicate.
    pub fn predicate<F>(pred: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |args| match args {
            [arg] => Ok(Value::Boolean(pred(arg))),
            _ => Err(Condition::wrong_num_of_args(1, args.len())),
        })
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Condition> {
        (self.0)(args)
    }
}

impl PartialEq for Procedure {
    fn eq(&self, rhs: &Self) -> bool {
        Arc::ptr_eq(&self.0, &rhs.0)
    }
}

impl Eq for Procedure {}

impl Hash for Procedure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0).cast::<()>(), state);
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<procedure>")
    }
}
