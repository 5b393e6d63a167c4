//! Scaffolding shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use record_factory::{Factory, RecordType, Symbol, Value};

pub fn vals<T, const N: usize>(items: [T; N]) -> Vec<Value>
where
    T: Into<Value>,
{
    items.into_iter().map(Into::into).collect()
}

pub fn sym(name: &str) -> Symbol {
    Symbol::intern(name)
}

/// An anonymous two field `x`, `y` record type.
pub fn point() -> Arc<RecordType> {
    Factory::new()
        .define(None, ["x", "y"])
        .expect("point type should be valid")
}
