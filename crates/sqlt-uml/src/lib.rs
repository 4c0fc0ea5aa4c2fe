#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # sqlt-uml
//!
//! Turns a UML class model into relational tables.
//!
//! Each visible class becomes a table, each visible attribute a field, and an
//! attribute with the `PK` stereotype becomes the table's primary key.

pub mod extractor;
pub mod model;
pub mod parser;
pub mod reader;

pub use extractor::{PRIMARY_KEY_STEREOTYPE, extract, is_visible};
pub use model::{Attribute, Class, ObjectGraph, Visibility};
pub use parser::{UmlParser, register};
pub use reader::read_object_graph;

use thiserror::Error;

/// Errors raised while reading or extracting a class model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid class model: {0}")]
    InvalidModel(String),

    #[error("Unknown visibility '{0}', expected public, protected or private")]
    UnknownVisibility(String),

    #[error(transparent)]
    Schema(#[from] sqlt_schema::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
