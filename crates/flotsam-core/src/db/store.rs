use crate::{db::Row, types::Ulid};
use flotsam_schema::{
    err,
    error::ErrorTree,
    node::Schema,
    policy::{MappingPolicy, ResolvedRelation},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("missing row '{id}' in entity '{entity}'")]
    MissingRow { entity: String, id: Ulid },

    #[error("referential integrity violated: {0}")]
    Integrity(ErrorTree),
}

///
/// Store
///
/// In-memory row store, one ordered table per declared entity. The store is
/// mechanical: cascade semantics live in the session, which mutates the
/// store only from a prevalidated plan.
///

#[derive(Debug)]
pub struct Store {
    tables: BTreeMap<String, BTreeMap<Ulid, Row>>,
}

impl Store {
    /// Create an empty store with one table per schema entity.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let tables = schema
            .entities()
            .map(|e| (e.name.clone(), BTreeMap::new()))
            .collect();

        Self { tables }
    }

    /// Insert or replace a row (physical upsert).
    pub fn insert(&mut self, entity: &str, row: Row) -> Result<(), StoreError> {
        let table = self.table_mut(entity)?;
        table.insert(row.id(), row);

        Ok(())
    }

    pub fn get(&self, entity: &str, id: Ulid) -> Result<&Row, StoreError> {
        self.table(entity)?
            .get(&id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: entity.to_string(),
                id,
            })
    }

    pub(crate) fn get_mut(&mut self, entity: &str, id: Ulid) -> Result<&mut Row, StoreError> {
        self.table_mut(entity)?
            .get_mut(&id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: entity.to_string(),
                id,
            })
    }

    pub fn remove(&mut self, entity: &str, id: Ulid) -> Result<Row, StoreError> {
        self.table_mut(entity)?
            .remove(&id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: entity.to_string(),
                id,
            })
    }

    #[must_use]
    pub fn contains(&self, entity: &str, id: Ulid) -> bool {
        self.tables.get(entity).is_some_and(|t| t.contains_key(&id))
    }

    /// Rows of one entity in identity order.
    pub fn rows(&self, entity: &str) -> Result<impl Iterator<Item = &Row>, StoreError> {
        Ok(self.table(entity)?.values())
    }

    pub(crate) fn rows_mut(
        &mut self,
        entity: &str,
    ) -> Result<impl Iterator<Item = &mut Row>, StoreError> {
        Ok(self.table_mut(entity)?.values_mut())
    }

    pub fn len(&self, entity: &str) -> Result<usize, StoreError> {
        Ok(self.table(entity)?.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }

    /// Rows of the relation's owning table whose foreign key points at
    /// `parent` (the derived view of a collection).
    pub fn children(
        &self,
        relation: &ResolvedRelation,
        parent: Ulid,
    ) -> Result<Vec<Ulid>, StoreError> {
        let table = self.table(&relation.owner)?;
        let ids = table
            .values()
            .filter(|row| row.get_ulid(&relation.key_column) == Some(parent))
            .map(Row::id)
            .collect();

        Ok(ids)
    }

    /// Audit every persisted foreign key against the policy: a set key must
    /// point at an existing row. Reports every violation at once.
    pub fn verify_integrity(&self, policy: &MappingPolicy) -> Result<(), StoreError> {
        let mut errs = ErrorTree::new();

        for relation in policy.relations().filter(|r| r.issues_writes()) {
            let Ok(table) = self.table(&relation.owner) else {
                err!(errs, "relation '{}' has no table", relation.route());
                continue;
            };

            for row in table.values() {
                if let Some(fk) = row.get_ulid(&relation.key_column)
                    && !self.contains(&relation.references, fk)
                {
                    err!(
                        errs,
                        "row '{}' of '{}' references missing '{}' row '{fk}' via '{}'",
                        row.id(),
                        relation.owner,
                        relation.references,
                        relation.key_column
                    );
                }
            }
        }

        errs.result().map_err(StoreError::Integrity)
    }

    fn table(&self, entity: &str) -> Result<&BTreeMap<Ulid, Row>, StoreError> {
        self.tables.get(entity).ok_or_else(|| StoreError::UnknownEntity {
            entity: entity.to_string(),
        })
    }

    fn table_mut(&mut self, entity: &str) -> Result<&mut BTreeMap<Ulid, Row>, StoreError> {
        self.tables.get_mut(entity).ok_or_else(|| StoreError::UnknownEntity {
            entity: entity.to_string(),
        })
    }
}
