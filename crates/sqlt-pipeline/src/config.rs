//! Engine configuration

use crate::plugin::{Options, VISIBILITY_OPTION};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::trace;

/// Default parser/producer and plugin options for a [`Translator`](crate::Translator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parser identifier (default: `identity`)
    #[serde(alias = "from")]
    pub parser: String,
    /// Producer identifier (default: `identity`)
    #[serde(alias = "to")]
    pub producer: String,
    /// Minimum visibility admitted by class-model parsers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Additional plugin options
    #[serde(skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parser: "identity".to_string(),
            producer: "identity".to_string(),
            visibility: None,
            options: Options::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser identifier
    #[must_use]
    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = parser.into();
        self
    }

    /// Set the producer identifier
    #[must_use]
    pub fn producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Set the visibility filter
    #[must_use]
    pub fn visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    /// Load configuration from a file, YAML for `.yaml`/`.yml` and JSON otherwise
    pub fn from_file(path: &Path) -> Result<Self> {
        trace!("Loading engine configuration from {:?}", path);
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io("read config", path.display().to_string(), e.to_string()))?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("YAML parse error: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("JSON parse error: {e}")))
    }

    /// Plugin options with the visibility filter folded in
    pub fn plugin_options(&self) -> Options {
        let mut options = self.options.clone();
        if let Some(visibility) = &self.visibility {
            options.set(VISIBILITY_OPTION, visibility.clone());
        }
        options
    }
}
