//! Schema model definitions

use crate::{Error, Result};
use serde::Serialize;
use tracing::trace;

/// A relational schema: an ordered set of uniquely named tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Optional schema name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    tables: Vec<Table>,
    /// Advisory error slot; empty means no error recorded
    #[serde(skip)]
    error: String,
}

/// A table: an ordered set of uniquely named fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    name: String,
    fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<String>,
}

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub data_type: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_primary_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Attributes used to create a [`Field`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    /// `None` leaves the field without any default entry
    pub default_value: Option<String>,
}

impl FieldSpec {
    /// Create a field spec with a name and data type
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    /// Mark the field as primary key
    #[must_use]
    pub fn primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    /// Set the default value
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl Schema {
    /// Create an empty, unnamed schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty schema with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a table. Fails if the name is empty or already taken.
    pub fn add_table(&mut self, name: impl Into<String>) -> Result<&mut Table> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_name("table", "name is empty"));
        }
        if self.has_table(&name) {
            return Err(Error::duplicate_table(name));
        }

        trace!(table = %name, "adding table");
        self.tables.push(Table::new(name));
        let index = self.tables.len() - 1;
        Ok(&mut self.tables[index])
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Tables in insertion order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Last recorded advisory error, empty when none
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Record an advisory error, replacing any previous one
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }
}

impl Table {
    fn new(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
            primary_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a field. Fails if the name is empty or already used in this table.
    pub fn add_field(&mut self, spec: FieldSpec) -> Result<&mut Field> {
        if spec.name.is_empty() {
            return Err(Error::invalid_name(
                "field",
                format!("empty field name in table '{}'", self.name),
            ));
        }
        if self.has_field(&spec.name) {
            return Err(Error::duplicate_field(&self.name, spec.name));
        }

        trace!(table = %self.name, field = %spec.name, "adding field");
        self.fields.push(Field {
            name: spec.name,
            data_type: spec.data_type,
            is_primary_key: spec.is_primary_key,
            default_value: spec.default_value,
        });
        let index = self.fields.len() - 1;
        Ok(&mut self.fields[index])
    }

    /// Register `field` as this table's primary key.
    ///
    /// A later call replaces an earlier registration.
    pub fn set_primary_key(&mut self, field: &str) -> Result<()> {
        let Some(target) = self.fields.iter_mut().find(|f| f.name == field) else {
            return Err(Error::unknown_field(&self.name, field));
        };
        target.is_primary_key = true;
        self.primary_key = Some(field.to_string());
        Ok(())
    }

    /// Name of the registered primary key field
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields in insertion order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_table_rejects_duplicates() {
        let mut schema = Schema::new();
        schema.add_table("Order").unwrap();

        let err = schema.add_table("Order").unwrap_err();
        assert_eq!(err, Error::duplicate_table("Order"));
        assert_eq!(schema.tables().len(), 1);
    }

    #[test]
    fn add_table_rejects_empty_name() {
        let mut schema = Schema::new();
        assert!(matches!(
            schema.add_table(""),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn fields_keep_insertion_order() {
        let mut schema = Schema::new();
        let table = schema.add_table("Customer").unwrap();
        table.add_field(FieldSpec::new("id", "integer")).unwrap();
        table.add_field(FieldSpec::new("name", "string")).unwrap();
        table.add_field(FieldSpec::new("email", "string")).unwrap();

        let names: Vec<_> = schema
            .table("Customer")
            .unwrap()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let mut schema = Schema::new();
        let table = schema.add_table("Customer").unwrap();
        table.add_field(FieldSpec::new("id", "integer")).unwrap();

        let err = table.add_field(FieldSpec::new("id", "string")).unwrap_err();
        assert_eq!(err, Error::duplicate_field("Customer", "id"));
    }

    #[test]
    fn primary_key_requires_existing_field() {
        let mut schema = Schema::new();
        let table = schema.add_table("Customer").unwrap();

        assert_eq!(
            table.set_primary_key("id"),
            Err(Error::unknown_field("Customer", "id"))
        );
        assert_eq!(table.primary_key(), None);
    }

    #[test]
    fn last_primary_key_registration_wins() {
        let mut schema = Schema::new();
        let table = schema.add_table("Link").unwrap();
        table.add_field(FieldSpec::new("a", "integer")).unwrap();
        table.add_field(FieldSpec::new("b", "integer")).unwrap();

        table.set_primary_key("a").unwrap();
        table.set_primary_key("b").unwrap();

        assert_eq!(table.primary_key(), Some("b"));
    }

    #[test]
    fn field_without_default_has_no_default_entry() {
        let mut schema = Schema::new();
        let table = schema.add_table("Customer").unwrap();
        let field = table.add_field(FieldSpec::new("name", "string")).unwrap();
        assert_eq!(field.default_value, None);

        let json = serde_json::to_value(&schema).unwrap();
        let field_json = &json["tables"][0]["fields"][0];
        assert!(field_json.get("default_value").is_none());
        assert!(field_json.get("is_primary_key").is_none());
    }

    #[test]
    fn error_slot_is_overwritten() {
        let mut schema = Schema::new();
        assert_eq!(schema.error(), "");

        schema.set_error("first");
        schema.set_error("second");
        assert_eq!(schema.error(), "second");
    }
}
