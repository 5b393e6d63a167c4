use std::fmt;

use ordered_float::OrderedFloat;

use crate::{exceptions::Condition, proc::Procedure, records::Record, symbols::Symbol};

/// A value held in a record slot.
#[derive(Clone, PartialEq, Eq, Hash, derive_more::Debug)]
pub enum Value {
    /// The absent value. `dig` stops when it reaches one.
    Null,
    Boolean(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Symbol(Symbol),
    Vector(Vec<Value>),
    Record(Box<Record>),
    Procedure(#[debug(skip)] Procedure),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null and false are false, everything else is true
    pub fn is_true(&self) -> bool {
        !matches!(self, Self::Null | Self::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Vector(_) => "vector",
            Self::Record(_) => "record",
            Self::Procedure(_) => "procedure",
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Indexed read on a record or vector. This is the single step `dig`
    /// applies along its key path.
    pub fn index(&self, key: Key) -> Result<&Value, Condition> {
        match self {
            Self::Record(record) => record.get(key),
            Self::Vector(items) => match key {
                Key::Index(index) => normalize_index(index, items.len())
                    .map(|i| &items[i])
                    .ok_or_else(|| Condition::invalid_index(index, items.len())),
                Key::Name(_) => Err(Condition::type_error("integer", "symbol")),
            },
            other => Err(Condition::type_error("record or vector", other.type_name())),
        }
    }
}

/// Resolve a possibly negative offset against a sequence of `len` items.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "nil"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{:?}", x.0),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(sym) => write!(f, ":{sym}"),
            Self::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(record) => write!(f, "{record}"),
            Self::Procedure(_) => write!(f, "#<procedure>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(OrderedFloat(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Vector(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(Box::new(record))
    }
}

impl From<Procedure> for Value {
    fn from(proc: Procedure) -> Self {
        Self::Procedure(proc)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl<'a> TryFrom<&'a Value> for &'a Procedure {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<&'a Procedure, Self::Error> {
        match v {
            Value::Procedure(proc) => Ok(proc),
            x => Err(Condition::type_error("procedure", x.type_name())),
        }
    }
}

/// A field address: an ordinal position or a field name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::From)]
pub enum Key {
    Index(i64),
    Name(Symbol),
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Self::Index(i64::from(i))
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Self::Index(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Name(Symbol::intern(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Name(Symbol::intern(&s))
    }
}

impl<'a> TryFrom<&'a Value> for Key {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<Key, Self::Error> {
        match v {
            Value::Integer(i) => Ok(Key::Index(*i)),
            Value::Symbol(sym) => Ok(Key::Name(*sym)),
            Value::String(s) => Ok(Key::Name(Symbol::intern(s))),
            x => Err(Condition::type_error("integer, symbol or string", x.type_name())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(sym) => write!(f, ":{sym}"),
        }
    }
}
