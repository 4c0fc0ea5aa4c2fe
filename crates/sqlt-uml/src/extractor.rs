//! Class-model extraction
//!
//! One pass over the classes, and per admitted class one pass over its
//! attributes. The first failure stops the pass; tables and fields already
//! added stay in the schema.

use crate::Result;
use crate::model::{ObjectGraph, Visibility};
use sqlt_schema::{FieldSpec, Schema};
use tracing::{debug, trace};

/// Stereotype marking an attribute as primary key
pub const PRIMARY_KEY_STEREOTYPE: &str = "PK";

/// Whether a node with `visibility` passes `filter`.
///
/// With no filter everything passes. Otherwise the node passes when it is at
/// least as open as the filter: `public` admits only public nodes, `private`
/// admits all of them.
pub fn is_visible(visibility: Visibility, filter: Option<Visibility>) -> bool {
    match filter {
        None => true,
        Some(limit) => limit.rank() >= visibility.rank(),
    }
}

/// Populate `schema` with a table per admitted class of `graph`
pub fn extract(graph: &ObjectGraph, filter: Option<Visibility>, schema: &mut Schema) -> Result<()> {
    for class in &graph.classes {
        if class.name.is_empty() {
            trace!("skipping unnamed class");
            continue;
        }
        if !is_visible(class.visibility, filter) {
            debug!(class = %class.name, visibility = %class.visibility, "class filtered out");
            continue;
        }

        let table = schema.add_table(class.name.as_str())?;

        for attribute in &class.attributes {
            if attribute.name.is_empty() || !is_visible(attribute.visibility, filter) {
                trace!(class = %class.name, attribute = %attribute.name, "attribute skipped");
                continue;
            }

            let is_primary_key =
                attribute.stereotype.as_deref() == Some(PRIMARY_KEY_STEREOTYPE);
            let spec = FieldSpec {
                name: attribute.name.clone(),
                data_type: attribute.datatype.clone(),
                is_primary_key,
                default_value: attribute.initial_value.clone(),
            };
            table.add_field(spec)?;

            if is_primary_key {
                table.set_primary_key(&attribute.name)?;
            }
        }

        debug!(
            table = %class.name,
            fields = table.fields().len(),
            "extracted table"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::model::{Attribute, Class};

    fn customer_graph() -> ObjectGraph {
        ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Customer", Visibility::Public)
                    .attribute(Attribute::new("name", "string"))
                    .attribute(Attribute::new("id", "integer").stereotype("PK")),
            ],
        }
    }

    #[test]
    fn customer_class_becomes_table_with_primary_key() {
        let mut schema = Schema::new();
        extract(&customer_graph(), None, &mut schema).unwrap();

        assert_eq!(schema.tables().len(), 1);
        let table = schema.table("Customer").unwrap();
        assert_eq!(table.fields().len(), 2);
        assert_eq!(table.primary_key(), Some("id"));

        let id = table.field("id").unwrap();
        assert!(id.is_primary_key);
        assert_eq!(id.data_type, "integer");

        let name = table.field("name").unwrap();
        assert!(!name.is_primary_key);
        assert_eq!(name.default_value, None);
    }

    #[test]
    fn private_nodes_need_a_private_filter() {
        use Visibility::*;

        assert!(!is_visible(Private, Some(Public)));
        assert!(!is_visible(Private, Some(Protected)));
        assert!(is_visible(Private, Some(Private)));
        assert!(is_visible(Private, None));
    }

    #[test]
    fn looser_filters_admit_more_open_nodes() {
        use Visibility::*;

        assert!(is_visible(Public, Some(Public)));
        assert!(is_visible(Public, Some(Protected)));
        assert!(is_visible(Protected, Some(Protected)));
        assert!(!is_visible(Protected, Some(Public)));
        assert!(is_visible(Protected, Some(Private)));
    }

    #[test]
    fn filtered_attributes_are_skipped() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Account", Visibility::Private)
                    .attribute(Attribute::new("balance", "decimal").visibility(Visibility::Private))
                    .attribute(Attribute::new("label", "string")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, Some(Visibility::Public), &mut schema).unwrap();
        assert!(!schema.has_table("Account"));

        let mut schema = Schema::new();
        extract(&graph, Some(Visibility::Private), &mut schema).unwrap();
        let table = schema.table("Account").unwrap();
        assert!(table.has_field("balance"));
        assert!(table.has_field("label"));

        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Profile", Visibility::Public)
                    .attribute(Attribute::new("secret", "string").visibility(Visibility::Private))
                    .attribute(Attribute::new("handle", "string")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, Some(Visibility::Public), &mut schema).unwrap();
        let table = schema.table("Profile").unwrap();
        assert!(!table.has_field("secret"));
        assert!(table.has_field("handle"));
    }

    #[test]
    fn unnamed_nodes_are_skipped() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("", Visibility::Public).attribute(Attribute::new("x", "int")),
                Class::new("Item", Visibility::Public)
                    .attribute(Attribute::new("", "int"))
                    .attribute(Attribute::new("sku", "string")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, None, &mut schema).unwrap();

        assert_eq!(schema.table_names().collect::<Vec<_>>(), vec!["Item"]);
        assert_eq!(schema.table("Item").unwrap().fields().len(), 1);
    }

    #[test]
    fn initial_value_becomes_default() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Setting", Visibility::Public)
                    .attribute(Attribute::new("enabled", "boolean").initial_value("true"))
                    .attribute(Attribute::new("note", "string").initial_value("")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, None, &mut schema).unwrap();

        let table = schema.table("Setting").unwrap();
        assert_eq!(table.field("enabled").unwrap().default_value.as_deref(), Some("true"));
        assert_eq!(table.field("note").unwrap().default_value.as_deref(), Some(""));
    }

    #[test]
    fn duplicate_class_halts_extraction_without_rollback() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Order", Visibility::Public).attribute(Attribute::new("id", "int")),
                Class::new("Order", Visibility::Public),
                Class::new("Invoice", Visibility::Public),
            ],
        };
        let mut schema = Schema::new();
        let err = extract(&graph, None, &mut schema).unwrap_err();

        assert_eq!(err, Error::Schema(sqlt_schema::Error::duplicate_table("Order")));
        assert_eq!(schema.table_names().collect::<Vec<_>>(), vec!["Order"]);
        assert!(schema.table("Order").unwrap().has_field("id"));
        assert!(!schema.has_table("Invoice"));
    }

    #[test]
    fn duplicate_attribute_halts_extraction() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("Order", Visibility::Public)
                    .attribute(Attribute::new("id", "int"))
                    .attribute(Attribute::new("id", "string"))
                    .attribute(Attribute::new("total", "decimal")),
                Class::new("Invoice", Visibility::Public),
            ],
        };
        let mut schema = Schema::new();
        let err = extract(&graph, None, &mut schema).unwrap_err();

        assert_eq!(
            err,
            Error::Schema(sqlt_schema::Error::duplicate_field("Order", "id"))
        );
        let order = schema.table("Order").unwrap();
        assert_eq!(order.fields().len(), 1);
        assert!(!schema.has_table("Invoice"));
    }

    #[test]
    fn last_pk_attribute_becomes_registered_key() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("OrderLine", Visibility::Public)
                    .attribute(Attribute::new("order_id", "integer").stereotype("PK"))
                    .attribute(Attribute::new("line_no", "integer").stereotype("PK"))
                    .attribute(Attribute::new("qty", "integer")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, None, &mut schema).unwrap();

        let table = schema.table("OrderLine").unwrap();
        assert_eq!(table.primary_key(), Some("line_no"));
        assert!(table.field("line_no").unwrap().is_primary_key);
        // The earlier PK attribute keeps its flag but is no longer the registered key
        assert!(table.field("order_id").unwrap().is_primary_key);
        assert!(!table.field("qty").unwrap().is_primary_key);
    }

    #[test]
    fn stereotype_match_is_exact() {
        let graph = ObjectGraph {
            name: String::new(),
            classes: vec![
                Class::new("T", Visibility::Public)
                    .attribute(Attribute::new("a", "int").stereotype("pk"))
                    .attribute(Attribute::new("b", "int").stereotype("PK ")),
            ],
        };
        let mut schema = Schema::new();
        extract(&graph, None, &mut schema).unwrap();

        let table = schema.table("T").unwrap();
        assert_eq!(table.primary_key(), None);
        assert!(table.fields().iter().all(|f| !f.is_primary_key));
    }
}
