//! Class-model reader
//!
//! Reads an [`ObjectGraph`] from a JSON or YAML document. JSON is assumed
//! when the document starts with `{`.

use crate::model::ObjectGraph;
use crate::{Error, Result};
use tracing::debug;

pub fn read_object_graph(text: &str) -> Result<ObjectGraph> {
    let graph: ObjectGraph = if text.trim_start().starts_with('{') {
        serde_json::from_str(text)
            .map_err(|e| Error::InvalidModel(format!("JSON parse error: {e}")))?
    } else {
        serde_yaml::from_str(text)
            .map_err(|e| Error::InvalidModel(format!("YAML parse error: {e}")))?
    };

    debug!(classes = graph.classes.len(), "read class model '{}'", graph.name);
    Ok(graph)
}
