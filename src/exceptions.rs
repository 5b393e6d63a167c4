//! Exceptional situations and conditions

use std::ops::Range;

use crate::symbols::Symbol;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    #[error("wrong number of arguments: expected {expected}, provided {provided}")]
    WrongNumberOfArgs { expected: usize, provided: usize },
    #[error("wrong number of arguments: expected {expected:?}, provided {provided}")]
    WrongNumberOfVarArgs {
        expected: Range<usize>,
        provided: usize,
    },
    #[error("offset {index} too large for record of size {len}")]
    InvalidIndex { index: i64, len: usize },
    #[error("no member `{0}` in record")]
    NoSuchField(Symbol),
    #[error("expected value of type {expected}, provided {provided}")]
    InvalidType { expected: String, provided: String },
    #[error("undefined method `{method}` for {type_name}")]
    UndefinedMethod { method: Symbol, type_name: String },
    #[error("duplicate member: {0}")]
    DuplicateField(Symbol),
    #[error("`{0}` is not a valid field name")]
    InvalidFieldName(String),
    #[error("`{0}` is not a valid record type name")]
    InvalidTypeName(String),
    #[error("`{0}` bound multiple times")]
    NameBoundMultipleTimes(Symbol),
    #[error("{0}")]
    Error(String),
}

impl Condition {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::Error(message.to_string())
    }

    pub fn wrong_num_of_args(expected: usize, provided: usize) -> Self {
        Self::WrongNumberOfArgs { expected, provided }
    }

    pub fn wrong_num_of_var_args(expected: Range<usize>, provided: usize) -> Self {
        Self::WrongNumberOfVarArgs { expected, provided }
    }

    pub fn invalid_index(index: i64, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn no_such_field(name: Symbol) -> Self {
        Self::NoSuchField(name)
    }

    pub fn type_error(expected: &str, provided: &str) -> Self {
        Self::InvalidType {
            expected: expected.to_string(),
            provided: provided.to_string(),
        }
    }

    pub fn undefined_method(method: Symbol, type_name: &str) -> Self {
        Self::UndefinedMethod {
            method,
            type_name: type_name.to_string(),
        }
    }
}
