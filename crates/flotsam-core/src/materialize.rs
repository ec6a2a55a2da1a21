//! Schema materialization interface.
//!
//! The engine only produces a resolved mapping table; turning it into a
//! physical schema is an external collaborator's job. The trait mirrors the
//! two calls a caller needs: create the catalog if absent, then apply the
//! schema with create-or-update semantics. Failures propagate unchanged.

use flotsam_schema::{node::Schema, policy::MappingPolicy};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// MaterializeError
///

#[derive(Debug, ThisError)]
pub enum MaterializeError {
    #[error("catalog name is empty")]
    EmptyCatalog,

    #[error("no catalog ensured before applying schema")]
    NoCatalog,
}

///
/// Materializer
///

pub trait Materializer {
    /// Create the catalog if it does not exist yet; idempotent.
    fn ensure_database(&mut self, catalog: &str) -> Result<(), MaterializeError>;

    /// Create or update the physical schema from the resolved policy;
    /// idempotent, re-applying converges.
    fn apply_schema(
        &mut self,
        schema: &Schema,
        policy: &MappingPolicy,
    ) -> Result<(), MaterializeError>;
}

///
/// MaterializedTable
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MaterializedTable {
    /// Physical (delimited) column names, identity included.
    pub columns: BTreeSet<String>,
    /// Foreign keys: delimited column -> referenced table.
    pub foreign_keys: BTreeMap<String, String>,
}

///
/// MemoryMaterializer
///
/// In-memory materializer for demos and tests. Keeps the catalog set and a
/// table map; `apply_schema` unions new columns into existing tables, which
/// gives the same create-or-update convergence a real materializer would.
///

#[derive(Debug, Default)]
pub struct MemoryMaterializer {
    catalogs: BTreeSet<String>,
    current: Option<String>,
    tables: BTreeMap<String, MaterializedTable>,
}

impl MemoryMaterializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog_exists(&self, catalog: &str) -> bool {
        self.catalogs.contains(catalog)
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&MaterializedTable> {
        self.tables.get(name)
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl Materializer for MemoryMaterializer {
    fn ensure_database(&mut self, catalog: &str) -> Result<(), MaterializeError> {
        if catalog.is_empty() {
            return Err(MaterializeError::EmptyCatalog);
        }

        self.catalogs.insert(catalog.to_string());
        self.current = Some(catalog.to_string());

        Ok(())
    }

    fn apply_schema(
        &mut self,
        _schema: &Schema,
        policy: &MappingPolicy,
    ) -> Result<(), MaterializeError> {
        if self.current.is_none() {
            return Err(MaterializeError::NoCatalog);
        }

        for resolved in policy.entities() {
            let table = self.tables.entry(resolved.table.clone()).or_default();

            table.columns.insert(resolved.id_column.clone());
            for column in &resolved.columns {
                table.columns.insert(column.column.clone());
            }
            for fk in &resolved.foreign_keys {
                table.columns.insert(fk.column.clone());
                table
                    .foreign_keys
                    .insert(fk.column.clone(), fk.references.clone());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Materializer, MaterializeError, MemoryMaterializer};
    use flotsam_schema::{
        build::{EntityBuilder, SchemaBuilder},
        policy::MappingPolicy,
        types::{Cascade, Primitive},
    };

    fn fixture() -> (flotsam_schema::node::Schema, MappingPolicy) {
        let schema = SchemaBuilder::new()
            .entity(
                EntityBuilder::new("Bottle")
                    .has_many("Messages", "Message")
                    .cascade(Cascade::AllDeleteOrphan),
            )
            .entity(
                EntityBuilder::new("Message")
                    .field("Text", Primitive::Text)
                    .field("Group", Primitive::Text),
            )
            .build()
            .unwrap();
        let policy = MappingPolicy::resolve(&schema).unwrap();

        (schema, policy)
    }

    #[test]
    fn apply_requires_an_ensured_catalog() {
        let (schema, policy) = fixture();
        let mut mat = MemoryMaterializer::new();

        let err = mat.apply_schema(&schema, &policy).unwrap_err();
        assert!(matches!(err, MaterializeError::NoCatalog));
    }

    #[test]
    fn ensure_database_is_idempotent() {
        let mut mat = MemoryMaterializer::new();
        mat.ensure_database("TestSimpleDb").unwrap();
        mat.ensure_database("TestSimpleDb").unwrap();
        assert!(mat.catalog_exists("TestSimpleDb"));
    }

    #[test]
    fn apply_schema_converges() {
        let (schema, policy) = fixture();
        let mut mat = MemoryMaterializer::new();
        mat.ensure_database("TestSimpleDb").unwrap();

        mat.apply_schema(&schema, &policy).unwrap();
        let first = mat.table("[Message]").unwrap().clone();

        mat.apply_schema(&schema, &policy).unwrap();
        assert_eq!(mat.table("[Message]").unwrap(), &first);
        assert_eq!(mat.table_count(), 2);
    }

    #[test]
    fn materialized_columns_are_delimited() {
        let (schema, policy) = fixture();
        let mut mat = MemoryMaterializer::new();
        mat.ensure_database("TestSimpleDb").unwrap();
        mat.apply_schema(&schema, &policy).unwrap();

        let message = mat.table("[Message]").unwrap();
        assert!(message.columns.contains("[Id]"));
        assert!(message.columns.contains("[Group]"));
        assert!(message.columns.contains("[Bottle_id]"));
        assert_eq!(
            message.foreign_keys.get("[Bottle_id]").map(String::as_str),
            Some("Bottle")
        );
    }
}
