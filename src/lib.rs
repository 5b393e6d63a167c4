pub mod builtins;
pub mod config;
pub mod exceptions;
pub mod factory;
pub mod proc;
pub mod records;
pub mod symbols;
pub mod value;

pub use config::{Config, Rebind};
pub use exceptions::Condition;
pub use factory::{Factory, Namespace};
pub use proc::Procedure;
pub use records::{Extension, Record, RecordType};
pub use symbols::Symbol;
pub use value::{Key, Value};
