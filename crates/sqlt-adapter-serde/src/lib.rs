#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # sqlt-adapter-serde
//!
//! Reads and writes schemas as JSON or YAML documents.

pub mod format;

pub use format::{DocumentFormat, DocumentParser, DocumentProducer};

use sqlt_pipeline::{PluginRegistry, Result};
use thiserror::Error;

/// Errors raised while rendering a schema document
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Register the `json` and `yaml` parsers and producers
pub fn register(registry: &PluginRegistry) -> Result<()> {
    for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
        registry.register_parser(format.name(), move || DocumentParser::new(format))?;
        registry.register_producer(format.name(), move || DocumentProducer::new(format))?;
    }
    registry.register_alias(sqlt_pipeline::Role::Parser, "yml", "yaml")?;
    registry.register_alias(sqlt_pipeline::Role::Producer, "yml", "yaml")?;
    Ok(())
}
