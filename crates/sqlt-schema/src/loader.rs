//! Schema loader for JSON and YAML documents

use crate::model::{FieldSpec, Schema};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, trace};

/// Serializable schema format for loading from documents
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tables: Vec<TableFile>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    name: String,
    #[serde(default)]
    fields: Vec<FieldFile>,
    #[serde(default)]
    primary_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldFile {
    name: String,
    #[serde(alias = "type")]
    data_type: String,
    #[serde(default)]
    is_primary_key: bool,
    #[serde(default)]
    default_value: Option<String>,
}

/// Builds [`Schema`] values from serialized documents.
///
/// Every table and field goes through the regular model operations, so a
/// document with duplicate names is rejected the same way a parser would be.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a schema from a file, choosing YAML for `.yaml`/`.yml` and JSON otherwise
    pub fn load_from_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidFormat(format!("cannot read '{}': {}", path.display(), e))
        })?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load a schema from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {}", e)))?;

        self.convert_schema_file(schema_file)
    }

    /// Load a schema from a YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {}", e)))?;

        self.convert_schema_file(schema_file)
    }

    fn convert_schema_file(&self, schema_file: SchemaFile) -> Result<Schema> {
        let mut schema = Schema::named(schema_file.name);

        for table_file in schema_file.tables {
            let table = schema.add_table(table_file.name)?;
            let mut flagged = None;

            for field_file in table_file.fields {
                let spec = FieldSpec {
                    name: field_file.name,
                    data_type: field_file.data_type,
                    is_primary_key: field_file.is_primary_key,
                    default_value: field_file.default_value,
                };
                let field = table.add_field(spec)?;
                if field.is_primary_key {
                    flagged = Some(field.name.clone());
                }
            }

            if let Some(pk) = table_file.primary_key.or(flagged) {
                table.set_primary_key(&pk)?;
            }
        }

        debug!(
            tables = schema.tables().len(),
            "Loaded schema '{}'", schema.name
        );
        Ok(schema)
    }
}
