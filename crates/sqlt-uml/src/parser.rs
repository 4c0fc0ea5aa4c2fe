//! `uml` parser plugin

use crate::extractor::extract;
use crate::model::Visibility;
use crate::reader::read_object_graph;
use sqlt_pipeline::plugin::VISIBILITY_OPTION;
use sqlt_pipeline::{Context, Error, Ir, Parser, PluginRegistry, Result, Role};
use sqlt_schema::Schema;
use tracing::info;

/// Parses a class model and extracts its tables.
///
/// Honors the `visibility` option; without it every named class and
/// attribute is admitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct UmlParser;

impl UmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for UmlParser {
    fn parse(&self, input: &str, ctx: &mut Context) -> Result<Ir> {
        let filter = ctx
            .options()
            .visibility()
            .map(str::parse::<Visibility>)
            .transpose()
            .map_err(|e| Error::invalid_option(VISIBILITY_OPTION, e.to_string()))?;

        let graph = read_object_graph(input).map_err(Error::plugin)?;
        let mut schema = Schema::named(graph.name.clone());
        extract(&graph, filter, &mut schema).map_err(Error::plugin)?;

        if schema.tables().is_empty() && !graph.classes.is_empty() {
            let message = match filter {
                Some(visibility) => {
                    format!("no class passed the {visibility} visibility filter")
                }
                None => "no named class found in the class model".to_string(),
            };
            ctx.report(message);
        }

        info!(tables = schema.tables().len(), "extracted schema from class model");
        Ok(Ir::Schema(schema))
    }
}

/// Register the `uml` parser and its `xmi` alias
pub fn register(registry: &PluginRegistry) -> Result<()> {
    registry.register_parser("uml", UmlParser::new)?;
    registry.register_alias(Role::Parser, "xmi", "uml")?;
    Ok(())
}
