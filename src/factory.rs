//! Creation of record types and the namespace named types are bound into.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::{
    config::{Config, Rebind},
    exceptions::Condition,
    records::{Extension, RecordType},
    symbols::Symbol,
    value::Value,
};

/// Named record types created by a [`Factory`].
#[derive(Debug, Default)]
pub struct Namespace {
    bindings: RwLock<IndexMap<Symbol, Arc<RecordType>>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.get(&Symbol::intern(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bound names, in the order they were first bound.
    pub fn names(&self) -> Vec<Symbol> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn bind(
        &self,
        name: Symbol,
        record_type: Arc<RecordType>,
        rebind: Rebind,
    ) -> Result<(), Condition> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if bindings.contains_key(&name) {
            match rebind {
                Rebind::Reject => return Err(Condition::NameBoundMultipleTimes(name)),
                Rebind::Replace => tracing::warn!(%name, "record type name rebound"),
            }
        }
        tracing::debug!(%name, "bound record type");
        bindings.insert(name, record_type);
        Ok(())
    }
}

/// Builds record types from field lists.
#[derive(Debug, Default)]
pub struct Factory {
    namespace: Namespace,
    config: Config,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            namespace: Namespace::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Look up a type previously created under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        self.namespace.get(name)
    }

    /// Create a record type with the given fields. If `name` is given, the
    /// type is also bound under it in this factory's namespace.
    pub fn define<I>(&self, name: Option<&str>, fields: I) -> Result<Arc<RecordType>, Condition>
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        self.define_with(name, fields, |_| Ok(()))
    }

    /// Like [`define`](Self::define), then run `extension` against the new
    /// type before it is sealed.
    pub fn define_with<I, F>(
        &self,
        name: Option<&str>,
        fields: I,
        extension: F,
    ) -> Result<Arc<RecordType>, Condition>
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
        F: FnOnce(&mut Extension<'_>) -> Result<(), Condition>,
    {
        let name = name.map(type_name).transpose()?;
        let mut record_type = RecordType::new(name, fields.into_iter().map(Into::into))?;
        extension(&mut Extension::new(&mut record_type))?;
        let record_type = Arc::new(record_type);
        tracing::debug!(
            name = ?name,
            fields = record_type.size(),
            "created record type"
        );
        if let Some(name) = name {
            self.namespace
                .bind(name, Arc::clone(&record_type), self.config.rebind)?;
        }
        Ok(record_type)
    }

    /// Create a record type from dynamic arguments. A leading string is the
    /// name to bind the type under; every other argument is a field name
    /// given as a symbol or string.
    pub fn create(&self, args: &[Value]) -> Result<Arc<RecordType>, Condition> {
        self.create_with(args, |_| Ok(()))
    }

    pub fn create_with<F>(&self, args: &[Value], extension: F) -> Result<Arc<RecordType>, Condition>
    where
        F: FnOnce(&mut Extension<'_>) -> Result<(), Condition>,
    {
        let (name, fields) = match args {
            [Value::String(name), fields @ ..] => (Some(name.as_str()), fields),
            fields => (None, fields),
        };
        let fields = fields
            .iter()
            .map(|field| match field {
                Value::Symbol(sym) => Ok(*sym),
                Value::String(s) => Ok(Symbol::intern(s)),
                x => Err(Condition::type_error("symbol or string", x.type_name())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.define_with(name, fields, extension)
    }
}

/// Type names follow constant naming: an uppercase ASCII letter followed by
/// letters, digits or underscores.
fn type_name(name: &str) -> Result<Symbol, Condition> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(Symbol::intern(name))
    } else {
        Err(Condition::InvalidTypeName(name.to_string()))
    }
}
