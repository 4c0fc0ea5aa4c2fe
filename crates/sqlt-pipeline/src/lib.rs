#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # sqlt-pipeline
//!
//! Two-stage schema translation: a parser turns input text into an
//! intermediate representation, a producer renders it into the target format.
//!
//! Parsers and producers are looked up by name in a [`PluginRegistry`] or
//! handed to the [`Translator`] directly.

pub mod config;
pub mod input;
pub mod plugin;
pub mod resolver;
pub mod translator;

pub use config::EngineConfig;
pub use input::{Input, Normalized, TranslateArgs, normalize};
pub use plugin::{Context, IdentityParser, IdentityProducer, Ir, Options, Parser, Producer};
pub use resolver::{PluginRef, PluginRegistry, Role};
pub use translator::{Outcome, Translator};

use thiserror::Error;

/// Boxed error raised inside a parser or producer
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while translating
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: cannot resolve {role} '{identifier}': {message}")]
    Configuration {
        role: Role,
        identifier: String,
        message: String,
    },

    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("Unsupported input for {plugin}: expected {expected}")]
    UnsupportedInput { plugin: String, expected: String },

    #[error("Invalid engine configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Plugin(#[source] BoxError),
}

impl Error {
    /// Create a configuration error for an identifier that cannot be resolved.
    pub fn configuration(
        role: Role,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            role,
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-option error.
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-input error for a plugin.
    pub fn unsupported_input(plugin: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnsupportedInput {
            plugin: plugin.into(),
            expected: expected.into(),
        }
    }

    /// Wrap a failure raised inside a plugin.
    pub fn plugin(source: impl Into<BoxError>) -> Self {
        Self::Plugin(source.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
