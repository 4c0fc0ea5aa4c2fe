//! Parser and producer capabilities
//!
//! A parser turns raw input text into an [`Ir`]; a producer renders an
//! [`Ir`] into the target format. What the IR holds is a contract between a
//! particular parser/producer pair, the engine never looks inside.

use crate::Result;
use serde::{Deserialize, Serialize};
use sqlt_schema::Schema;
use std::collections::BTreeMap;

/// Option key selecting the minimum visibility admitted by class-model parsers
pub const VISIBILITY_OPTION: &str = "visibility";

/// Intermediate representation passed from parser to producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ir {
    /// Plain text
    Text(String),
    /// A populated relational schema
    Schema(Schema),
}

impl Ir {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Ir::Text(text) => Some(text),
            Ir::Schema(_) => None,
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Ir::Schema(schema) => Some(schema),
            Ir::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Ir::Text(text) => Some(text),
            Ir::Schema(_) => None,
        }
    }

    pub fn into_schema(self) -> Option<Schema> {
        match self {
            Ir::Schema(schema) => Some(schema),
            Ir::Text(_) => None,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Ir::Text(_) => "text",
            Ir::Schema(_) => "schema",
        }
    }
}

impl From<String> for Ir {
    fn from(text: String) -> Self {
        Ir::Text(text)
    }
}

impl From<Schema> for Ir {
    fn from(schema: Schema) -> Self {
        Ir::Schema(schema)
    }
}

/// Passthrough options consumed by parsers and producers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`Options::set`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Requested visibility filter, if any
    pub fn visibility(&self) -> Option<&str> {
        self.get(VISIBILITY_OPTION)
    }

    /// Copy every entry of `other` over this set
    pub fn merge(&mut self, other: Options) {
        self.values.extend(other.values);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-call state handed to plugins: the options and the advisory report channel
#[derive(Debug, Default)]
pub struct Context {
    options: Options,
    report: Option<String>,
}

impl Context {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            report: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Record a non-fatal error message. Replaces any earlier report.
    pub fn report(&mut self, message: impl Into<String>) {
        self.report = Some(message.into());
    }

    pub fn reported(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub(crate) fn take_report(&mut self) -> Option<String> {
        self.report.take()
    }
}

/// Transform from raw input text to an intermediate representation
pub trait Parser: Send + Sync {
    fn parse(&self, input: &str, ctx: &mut Context) -> Result<Ir>;
}

/// Transform from an intermediate representation to the final output
pub trait Producer: Send + Sync {
    fn produce(&self, ir: Ir, ctx: &mut Context) -> Result<Ir>;
}

impl<F> Parser for F
where
    F: Fn(&str, &mut Context) -> Result<Ir> + Send + Sync,
{
    fn parse(&self, input: &str, ctx: &mut Context) -> Result<Ir> {
        self(input, ctx)
    }
}

impl<F> Producer for F
where
    F: Fn(Ir, &mut Context) -> Result<Ir> + Send + Sync,
{
    fn produce(&self, ir: Ir, ctx: &mut Context) -> Result<Ir> {
        self(ir, ctx)
    }
}

/// Parser that hands the input text through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityParser;

impl Parser for IdentityParser {
    fn parse(&self, input: &str, _ctx: &mut Context) -> Result<Ir> {
        Ok(Ir::Text(input.to_string()))
    }
}

/// Producer that returns the intermediate representation unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProducer;

impl Producer for IdentityProducer {
    fn produce(&self, ir: Ir, _ctx: &mut Context) -> Result<Ir> {
        Ok(ir)
    }
}
