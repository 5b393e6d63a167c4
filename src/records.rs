//! Record types and the records built from them.

use std::{fmt, sync::Arc};

use by_address::ByAddress;
use indexmap::{IndexMap, IndexSet};

use crate::{
    builtins::{self, Builtin},
    exceptions::Condition,
    symbols::Symbol,
    value::{normalize_index, Key, Value},
};

type MethodFn = dyn Fn(&mut Record, &[Value]) -> Result<Value, Condition> + Send + Sync;

/// What a method name resolves to on a particular record type.
#[derive(Clone)]
enum Dispatch {
    Method(Arc<MethodFn>),
    Builtin(Builtin),
    Reader(usize),
    Writer(usize),
}

impl Dispatch {
    fn invoke(&self, record: &mut Record, args: &[Value]) -> Result<Value, Condition> {
        match self {
            Self::Method(method) => method(record, args),
            Self::Builtin(builtin) => builtin.call(record, args),
            Self::Reader(index) => match args {
                [] => Ok(record.values[*index].clone()),
                _ => Err(Condition::wrong_num_of_args(0, args.len())),
            },
            Self::Writer(index) => match args {
                [value] => {
                    record.values[*index] = value.clone();
                    Ok(value.clone())
                }
                _ => Err(Condition::wrong_num_of_args(1, args.len())),
            },
        }
    }
}

/// Type declaration for a record.
///
/// The field list is fixed once the type is created. Record types are
/// shared behind an [`Arc`] and never mutated afterwards, so a single type
/// can construct records on any number of threads.
pub struct RecordType {
    name: Option<Symbol>,
    fields: IndexSet<Symbol>,
    /// `field=` mutator names, mapped to the slot they write.
    writers: IndexMap<Symbol, usize>,
    /// Methods added by the extension block.
    methods: IndexMap<Symbol, Dispatch>,
}

impl RecordType {
    pub(crate) fn new<I>(name: Option<Symbol>, fields: I) -> Result<Self, Condition>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut unique = IndexSet::new();
        for field in fields {
            if !is_field_name(&field.to_str()) {
                return Err(Condition::InvalidFieldName(field.to_string()));
            }
            if !unique.insert(field) {
                return Err(Condition::DuplicateField(field));
            }
        }
        let writers = unique
            .iter()
            .enumerate()
            .map(|(i, field)| (Symbol::intern(&format!("{field}=")), i))
            .collect();
        Ok(Self {
            name,
            fields: unique,
            writers,
            methods: IndexMap::new(),
        })
    }

    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn members(&self) -> Vec<Symbol> {
        self.fields.iter().copied().collect()
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = Symbol> + '_ {
        self.fields.iter().copied()
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn index_of(&self, field: impl Into<Symbol>) -> Option<usize> {
        self.fields.get_index_of(&field.into())
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.resolve(Symbol::intern(method)).is_some()
    }

    /// Construct a record from one positional argument per field.
    pub fn new_record(self: &Arc<Self>, args: impl Into<Vec<Value>>) -> Result<Record, Condition> {
        let values = args.into();
        if values.len() != self.fields.len() {
            return Err(Condition::wrong_num_of_args(
                self.fields.len(),
                values.len(),
            ));
        }
        Ok(Record {
            record_type: ByAddress(Arc::clone(self)),
            values,
        })
    }

    /// Later definitions shadow earlier ones: extension methods first, then
    /// the shared builtins, then the generated accessors.
    fn resolve(&self, method: Symbol) -> Option<Dispatch> {
        self.methods
            .get(&method)
            .cloned()
            .or_else(|| builtins::lookup(method).map(Dispatch::Builtin))
            .or_else(|| self.fields.get_index_of(&method).map(Dispatch::Reader))
            .or_else(|| self.writers.get(&method).copied().map(Dispatch::Writer))
    }

    pub(crate) fn display_name(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => "anonymous record".to_string(),
        }
    }
}

/// Field names are plain identifiers. Anything else could collide with a
/// generated `name=` mutator or be unreachable as a method.
fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The body of a record type under construction.
///
/// An extension block receives this after the accessors and builtins are in
/// place, so anything it defines overrides them.
pub struct Extension<'a> {
    record_type: &'a mut RecordType,
}

impl<'a> Extension<'a> {
    pub(crate) fn new(record_type: &'a mut RecordType) -> Self {
        Self { record_type }
    }

    pub fn name(&self) -> Option<Symbol> {
        self.record_type.name
    }

    pub fn members(&self) -> Vec<Symbol> {
        self.record_type.members()
    }

    pub fn define_method<F>(&mut self, name: &str, method: F) -> &mut Self
    where
        F: Fn(&mut Record, &[Value]) -> Result<Value, Condition> + Send + Sync + 'static,
    {
        self.record_type
            .methods
            .insert(Symbol::intern(name), Dispatch::Method(Arc::new(method)));
        self
    }

    /// Copy the current definition of `old_name` to `new_name`. Redefining
    /// `old_name` afterwards does not affect the alias.
    pub fn alias_method(&mut self, new_name: &str, old_name: &str) -> Result<&mut Self, Condition> {
        let old_name = Symbol::intern(old_name);
        let dispatch = self.record_type.resolve(old_name).ok_or_else(|| {
            Condition::undefined_method(old_name, &self.record_type.display_name())
        })?;
        self.record_type
            .methods
            .insert(Symbol::intern(new_name), dispatch);
        Ok(self)
    }
}

/// An instance of a [`RecordType`]. Equal to another record only if both
/// were built from the same type and hold equal values.
#[derive(Clone, PartialEq, Eq, Hash, derive_more::Debug)]
pub struct Record {
    #[debug(skip)]
    record_type: ByAddress<Arc<RecordType>>,
    values: Vec<Value>,
}

impl Record {
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type.0
    }

    fn position(&self, key: Key) -> Result<usize, Condition> {
        match key {
            Key::Index(index) => normalize_index(index, self.values.len())
                .ok_or_else(|| Condition::invalid_index(index, self.values.len())),
            Key::Name(name) => self
                .record_type
                .0
                .fields
                .get_index_of(&name)
                .ok_or_else(|| Condition::no_such_field(name)),
        }
    }

    pub fn get(&self, key: impl Into<Key>) -> Result<&Value, Condition> {
        let index = self.position(key.into())?;
        Ok(&self.values[index])
    }

    pub fn get_mut(&mut self, key: impl Into<Key>) -> Result<&mut Value, Condition> {
        let index = self.position(key.into())?;
        Ok(&mut self.values[index])
    }

    /// Overwrite a field in place, returning the value now stored there.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<&Value, Condition> {
        let slot = self.get_mut(key)?;
        *slot = value.into();
        Ok(&*slot)
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn members(&self) -> Vec<Symbol> {
        self.record_type.0.members()
    }

    pub fn to_a(&self) -> Vec<Value> {
        self.values.clone()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn each(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn each_pair(&self) -> impl Iterator<Item = (Symbol, &Value)> + '_ {
        self.record_type.0.fields().zip(self.values.iter())
    }

    /// Follow `keys` through nested records and vectors. A null or false
    /// value part way along the path ends the walk with null; a key that
    /// does not exist is still an error.
    pub fn dig(&self, keys: &[Key]) -> Result<&Value, Condition> {
        static NULL: Value = Value::Null;

        let Some((&first, rest)) = keys.split_first() else {
            return Err(Condition::wrong_num_of_var_args(1..usize::MAX, 0));
        };
        let mut current = self.get(first)?;
        for &key in rest {
            if !current.is_true() {
                return Ok(&NULL);
            }
            current = current.index(key)?;
        }
        Ok(current)
    }

    pub fn select<P>(&self, mut predicate: P) -> Vec<Value>
    where
        P: FnMut(&Value) -> bool,
    {
        self.values
            .iter()
            .filter(|value| predicate(value))
            .cloned()
            .collect()
    }

    pub fn values_at(&self, keys: &[Key]) -> Result<Vec<Value>, Condition> {
        keys.iter().map(|&key| self.get(key).cloned()).collect()
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.record_type.0.responds_to(method)
    }

    /// Call a method by name: an extension method, a builtin or a field
    /// accessor (`x`) or mutator (`x=`).
    pub fn send(&mut self, method: &str, args: &[Value]) -> Result<Value, Condition> {
        let method = Symbol::intern(method);
        let record_type = &self.record_type.0;
        tracing::trace!(%method, record_type = %record_type.display_name(), "send");
        let dispatch = record_type.resolve(method).ok_or_else(|| {
            Condition::undefined_method(method, &record_type.display_name())
        })?;
        dispatch.invoke(self, args)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.each()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<record")?;
        if let Some(name) = self.record_type.0.name {
            write!(f, " {name}")?;
        }
        for (i, (field, value)) in self.each_pair().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{field}={value}")?;
        }
        write!(f, ">")
    }
}
