#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # sqlt-schema
//!
//! Canonical in-memory relational schema shared by parsers and producers.
//!
//! Parsers populate a [`Schema`] through [`Schema::add_table`] and
//! [`Table::add_field`]; producers read it back in insertion order.

pub mod loader;
pub mod model;

pub use loader::SchemaLoader;
pub use model::{Field, FieldSpec, Schema, Table};

use thiserror::Error;

/// Errors raised while building or loading a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Duplicate table name: {name}")]
    DuplicateTable { name: String },

    #[error("Duplicate field name '{field}' in table '{table}'")]
    DuplicateField { table: String, field: String },

    #[error("Unknown field '{field}' in table '{table}'")]
    UnknownField { table: String, field: String },

    #[error("Invalid {kind} name: {reason}")]
    InvalidName { kind: String, reason: String },

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Build a duplicate-table error.
    pub fn duplicate_table(name: impl Into<String>) -> Self {
        Self::DuplicateTable { name: name.into() }
    }

    /// Build a duplicate-field error with table context.
    pub fn duplicate_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Build an unknown-field error with table context.
    pub fn unknown_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Build an invalid-name error for a table or field.
    pub fn invalid_name(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
