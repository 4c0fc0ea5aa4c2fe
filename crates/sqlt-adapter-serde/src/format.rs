//! Document parsers and producers

use crate::Error as FormatError;
use sqlt_pipeline::{Context, Error, Ir, Parser, Producer, Result};
use sqlt_schema::SchemaLoader;
use tracing::debug;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Short plugin name
    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

/// Loads a schema document
#[derive(Debug, Clone, Copy)]
pub struct DocumentParser {
    format: DocumentFormat,
}

impl DocumentParser {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }
}

impl Parser for DocumentParser {
    fn parse(&self, input: &str, _ctx: &mut Context) -> Result<Ir> {
        let loader = SchemaLoader::new();
        let schema = match self.format {
            DocumentFormat::Json => loader.load_from_json(input),
            DocumentFormat::Yaml => loader.load_from_yaml(input),
        }
        .map_err(Error::plugin)?;

        debug!(format = self.format.name(), tables = schema.tables().len(), "parsed schema document");
        Ok(Ir::Schema(schema))
    }
}

/// Renders a schema as a document
#[derive(Debug, Clone, Copy)]
pub struct DocumentProducer {
    format: DocumentFormat,
}

impl DocumentProducer {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }
}

impl Producer for DocumentProducer {
    fn produce(&self, ir: Ir, _ctx: &mut Context) -> Result<Ir> {
        let Ir::Schema(schema) = ir else {
            return Err(Error::unsupported_input(
                format!("{} producer", self.format.name()),
                "a schema",
            ));
        };

        let text = match self.format {
            DocumentFormat::Json => serde_json::to_string_pretty(&schema)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(FormatError::from),
            DocumentFormat::Yaml => serde_yaml::to_string(&schema).map_err(FormatError::from),
        }
        .map_err(Error::plugin)?;

        debug!(format = self.format.name(), bytes = text.len(), "rendered schema document");
        Ok(Ir::Text(text))
    }
}
