//! Structural operations shared by every record type.
//!
//! These are reachable through [`Record::send`] under their listed names.
//! A record type's extension block may shadow any of them.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use indexmap::IndexMap;
use record_factory_macros::builtin;

use crate::{
    exceptions::Condition,
    proc::Procedure,
    records::Record,
    symbols::Symbol,
    value::{Key, Value},
};

pub(crate) type BuiltinFn = fn(&mut Record, &[Value]) -> Result<Value, Condition>;

#[derive(Copy, Clone)]
pub(crate) struct Builtin {
    names: &'static [&'static str],
    num_args: usize,
    variadic: bool,
    wrapper: BuiltinFn,
}

impl Builtin {
    pub(crate) const fn new(
        names: &'static [&'static str],
        num_args: usize,
        variadic: bool,
        wrapper: BuiltinFn,
    ) -> Self {
        Self {
            names,
            num_args,
            variadic,
            wrapper,
        }
    }

    pub(crate) fn call(&self, record: &mut Record, args: &[Value]) -> Result<Value, Condition> {
        if self.variadic {
            if args.len() < self.num_args {
                return Err(Condition::wrong_num_of_var_args(
                    self.num_args..usize::MAX,
                    args.len(),
                ));
            }
        } else if args.len() != self.num_args {
            return Err(Condition::wrong_num_of_args(self.num_args, args.len()));
        }
        (self.wrapper)(record, args)
    }
}

static BUILTINS: LazyLock<IndexMap<Symbol, Builtin>> = LazyLock::new(|| {
    [
        GET_BUILTIN,
        SET_BUILTIN,
        SIZE_BUILTIN,
        MEMBERS_BUILTIN,
        TO_A_BUILTIN,
        EACH_BUILTIN,
        EACH_PAIR_BUILTIN,
        DIG_BUILTIN,
        SELECT_BUILTIN,
        VALUES_AT_BUILTIN,
        EQUAL_BUILTIN,
        INSPECT_BUILTIN,
        HASH_BUILTIN,
    ]
    .into_iter()
    .flat_map(|builtin| {
        builtin
            .names
            .iter()
            .map(move |name| (Symbol::intern(name), builtin))
    })
    .collect()
});

pub(crate) fn lookup(name: Symbol) -> Option<Builtin> {
    BUILTINS.get(&name).copied()
}

/// Names of every shared operation.
pub fn names() -> Vec<Symbol> {
    BUILTINS.keys().copied().collect()
}

fn block_arg(block: &[Value]) -> Result<Option<&Procedure>, Condition> {
    match block {
        [] => Ok(None),
        [proc] => Ok(Some(proc.try_into()?)),
        _ => Err(Condition::wrong_num_of_var_args(0..2, block.len())),
    }
}

#[builtin("[]", "get")]
fn get(record: &mut Record, key: &Value) -> Result<Value, Condition> {
    record.get(Key::try_from(key)?).cloned()
}

#[builtin("[]=", "set")]
fn set(record: &mut Record, key: &Value, value: &Value) -> Result<Value, Condition> {
    record.set(Key::try_from(key)?, value.clone()).cloned()
}

#[builtin("size", "length")]
fn size(record: &mut Record) -> Result<Value, Condition> {
    Ok(Value::from(record.size()))
}

#[builtin("members")]
fn members(record: &mut Record) -> Result<Value, Condition> {
    Ok(Value::Vector(
        record.members().into_iter().map(Value::Symbol).collect(),
    ))
}

#[builtin("to_a", "deconstruct")]
fn to_a(record: &mut Record) -> Result<Value, Condition> {
    Ok(Value::Vector(record.to_a()))
}

/// With a block, call it once per value. Either way the values are returned.
#[builtin("each")]
fn each(record: &mut Record, block: &[Value]) -> Result<Value, Condition> {
    if let Some(block) = block_arg(block)? {
        for value in record.each() {
            block.call(std::slice::from_ref(value))?;
        }
    }
    Ok(Value::Vector(record.to_a()))
}

/// With a block, call it once per `[field, value]` pair. Either way the
/// pairs are returned.
#[builtin("each_pair")]
fn each_pair(record: &mut Record, block: &[Value]) -> Result<Value, Condition> {
    let block = block_arg(block)?;
    let mut pairs = Vec::with_capacity(record.size());
    for (field, value) in record.each_pair() {
        let pair = vec![Value::Symbol(field), value.clone()];
        if let Some(block) = block {
            block.call(&pair)?;
        }
        pairs.push(Value::Vector(pair));
    }
    Ok(Value::Vector(pairs))
}

/// Each step on a record goes through its `[]` method, so an extension that
/// redefines `[]` is honored along the whole path. A false or null value part
/// way along stops the walk with null.
#[builtin("dig")]
fn dig(record: &mut Record, first: &Value, rest: &[Value]) -> Result<Value, Condition> {
    let mut current = record.send("[]", std::slice::from_ref(first))?;
    for key in rest {
        if !current.is_true() {
            return Ok(Value::Null);
        }
        let next = match &mut current {
            Value::Record(inner) => inner.send("[]", std::slice::from_ref(key))?,
            other => other.index(Key::try_from(key)?)?.clone(),
        };
        current = next;
    }
    Ok(current)
}

#[builtin("select", "filter")]
fn select(record: &mut Record, predicate: &Value) -> Result<Value, Condition> {
    let predicate: &Procedure = predicate.try_into()?;
    let mut selected = Vec::new();
    for value in record.each() {
        if predicate.call(std::slice::from_ref(value))?.is_true() {
            selected.push(value.clone());
        }
    }
    Ok(Value::Vector(selected))
}

#[builtin("values_at")]
fn values_at(record: &mut Record, keys: &[Value]) -> Result<Value, Condition> {
    let keys = keys
        .iter()
        .map(Key::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Vector(record.values_at(&keys)?))
}

#[builtin("==", "eql?")]
fn equal(record: &mut Record, other: &Value) -> Result<Value, Condition> {
    Ok(Value::Boolean(
        other.as_record().is_some_and(|other| other == &*record),
    ))
}

#[builtin("to_s", "inspect")]
fn inspect(record: &mut Record) -> Result<Value, Condition> {
    Ok(Value::String(record.to_string()))
}

#[builtin("hash")]
fn hash(record: &mut Record) -> Result<Value, Condition> {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    Ok(Value::Integer(i64::from_ne_bytes(
        hasher.finish().to_ne_bytes(),
    )))
}
