use crate::{
    db::{Row, Store, StoreError},
    types::Ulid,
    value::Value,
};
use flotsam_schema::{node::Schema, policy::MappingPolicy, types::Primitive};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error as ThisError;

///
/// SessionError
///

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("unknown column '{entity}.{column}'")]
    UnknownColumn { entity: String, column: String },

    #[error("type mismatch for '{entity}.{column}': expected {expected}")]
    TypeMismatch {
        entity: String,
        column: String,
        expected: Primitive,
    },

    #[error("foreign key '{entity}.{column}' must be a ulid or null")]
    BadForeignKey { entity: String, column: String },

    #[error("unknown relation '{route}'")]
    UnknownRelation { route: String },

    #[error("relation '{route}' is not a collection")]
    NotCollection { route: String },

    #[error("row '{id}' of '{entity}' references missing '{references}' row via '{column}'")]
    DanglingReference {
        entity: String,
        column: String,
        references: String,
        id: Ulid,
    },

    #[error("row '{child}' is not in collection '{route}' of row '{parent}'")]
    NotInCollection {
        route: String,
        parent: Ulid,
        child: Ulid,
    },
}

///
/// Session
///
/// Explicit unit of work over a store. Saves are staged and applied on
/// `flush`; deletes plan their full cascade closure before any row is
/// touched, then apply mechanically. Inverse relationship sides never
/// issue writes.
///
/// Atomicity invariant:
/// All fallible validation and planning completes before mutation starts.
///

pub struct Session<'a> {
    schema: &'a Schema,
    policy: &'a MappingPolicy,
    store: &'a mut Store,
    staged: Vec<(String, Row)>,
    debug: bool,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, policy: &'a MappingPolicy, store: &'a mut Store) -> Self {
        Self {
            schema,
            policy,
            store,
            staged: Vec::new(),
            debug: false,
        }
    }

    // Debug is session-scoped; mutation paths do not expose independent
    // debug control.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;

        self
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    /// Stage a row for persistence. Columns are checked against the schema
    /// and policy up front; the store is untouched until `flush`.
    pub fn save(&mut self, entity: &str, row: Row) -> Result<Ulid, SessionError> {
        let declared = self
            .schema
            .get_entity(entity)
            .ok_or_else(|| SessionError::UnknownEntity {
                entity: entity.to_string(),
            })?;

        for (column, value) in row.values() {
            if let Some(field) = declared.get_field(column) {
                if !value.matches(field.primitive) {
                    return Err(SessionError::TypeMismatch {
                        entity: entity.to_string(),
                        column: column.to_string(),
                        expected: field.primitive,
                    });
                }
            } else if self.is_key_column(entity, column) {
                if !matches!(value, Value::Ulid(_) | Value::Null) {
                    return Err(SessionError::BadForeignKey {
                        entity: entity.to_string(),
                        column: column.to_string(),
                    });
                }
            } else {
                return Err(SessionError::UnknownColumn {
                    entity: entity.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let id = row.id();
        self.staged.push((entity.to_string(), row));
        self.debug_log(format!("staged save of '{entity}' row '{id}'"));

        Ok(id)
    }

    /// Apply staged saves. Every written foreign key must resolve against
    /// the store or another staged row before anything is applied.
    pub fn flush(&mut self) -> Result<usize, SessionError> {
        let staged = std::mem::take(&mut self.staged);

        // Validation phase: no mutation until every key resolves.
        for (entity, row) in &staged {
            for relation in self
                .policy
                .relations()
                .filter(|r| r.owner == *entity && r.issues_writes())
            {
                let Some(fk) = row.get_ulid(&relation.key_column) else {
                    continue;
                };

                let resolves = self.store.contains(&relation.references, fk)
                    || staged
                        .iter()
                        .any(|(e, r)| e == &relation.references && r.id() == fk);
                if !resolves {
                    return Err(SessionError::DanglingReference {
                        entity: entity.clone(),
                        column: relation.key_column.clone(),
                        references: relation.references.clone(),
                        id: row.id(),
                    });
                }
            }
        }

        // Apply phase: mechanical.
        let count = staged.len();
        for (entity, row) in staged {
            self.store.insert(&entity, row)?;
        }
        self.debug_log(format!("flush applied {count} row(s)"));

        Ok(count)
    }

    /// Delete a row, cascading per the resolved policy.
    ///
    /// Returns every `(entity, id)` removed, the requested row included.
    /// Relationships that do not cascade deletes are never followed; scalar
    /// references left pointing at removed rows are nulled.
    pub fn delete(&mut self, entity: &str, id: Ulid) -> Result<Vec<(String, Ulid)>, SessionError> {
        // Plan phase: compute the cascade closure; no mutation.
        let plan = self.plan_delete(entity, id)?;
        self.debug_log(format!(
            "delete plan for '{entity}' row '{id}' -> {} row(s)",
            plan.len()
        ));

        // Apply phase: remove planned rows, then null dangling references.
        let mut removed: BTreeMap<&str, BTreeSet<Ulid>> = BTreeMap::new();
        for (ent, rid) in &plan {
            self.store.remove(ent, *rid)?;
            removed.entry(ent.as_str()).or_default().insert(*rid);
        }
        self.null_dangling_references(&removed)?;

        Ok(plan)
    }

    /// Remove a child from a collection. Delete-orphan collections delete
    /// the removed child; all others only clear the child's foreign key,
    /// so inverse views never destroy what they navigate to.
    pub fn remove_child(
        &mut self,
        entity: &str,
        relation: &str,
        parent: Ulid,
        child: Ulid,
    ) -> Result<bool, SessionError> {
        let route = format!("{entity}.{relation}");
        let policy = self.policy;
        let resolved = policy
            .relation(entity, relation)
            .ok_or(SessionError::UnknownRelation {
                route: route.clone(),
            })?;
        if !resolved.cardinality.is_collection() {
            return Err(SessionError::NotCollection { route });
        }

        let row = self.store.get(&resolved.owner, child)?;
        if row.get_ulid(&resolved.key_column) != Some(parent) {
            return Err(SessionError::NotInCollection {
                route,
                parent,
                child,
            });
        }

        if resolved.cascade.removes_orphans() {
            self.debug_log(format!("orphan removal of '{}' row '{child}'", resolved.owner));
            self.delete(&resolved.target, child)?;

            Ok(true)
        } else {
            self.store.get_mut(&resolved.owner, child)?.clear(&resolved.key_column);
            self.debug_log(format!(
                "detached '{}' row '{child}' from '{route}' (no orphan cascade)",
                resolved.owner
            ));

            Ok(false)
        }
    }

    // Breadth-first closure over delete-cascading relationships. Cycle
    // configurations are rejected at policy resolution; the visited set here
    // only deduplicates diamond-shaped reachability.
    fn plan_delete(
        &self,
        entity: &str,
        id: Ulid,
    ) -> Result<Vec<(String, Ulid)>, SessionError> {
        // Existence check up front so the apply phase cannot fail.
        self.store.get(entity, id)?;

        let mut plan = Vec::new();
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([(entity.to_string(), id)]);

        while let Some((ent, rid)) = queue.pop_front() {
            if !visited.insert((ent.clone(), rid)) {
                continue;
            }

            // Every planned row must exist before the apply phase starts.
            let row = self.store.get(&ent, rid)?;

            for relation in self
                .policy
                .relations_from(&ent)
                .filter(|r| r.cascade.cascades_delete())
            {
                if relation.cardinality.is_collection() {
                    for child in self.store.children(relation, rid)? {
                        queue.push_back((relation.target.clone(), child));
                    }
                } else if let Some(fk) = row.get_ulid(&relation.key_column) {
                    queue.push_back((relation.target.clone(), fk));
                }
            }

            plan.push((ent, rid));
        }

        Ok(plan)
    }

    // Null every persisted foreign key left pointing at a removed row.
    fn null_dangling_references(
        &mut self,
        removed: &BTreeMap<&str, BTreeSet<Ulid>>,
    ) -> Result<(), SessionError> {
        for relation in self.policy.relations().filter(|r| r.issues_writes()) {
            let Some(ids) = removed.get(relation.references.as_str()) else {
                continue;
            };

            for row in self.store.rows_mut(&relation.owner)? {
                if row
                    .get_ulid(&relation.key_column)
                    .is_some_and(|fk| ids.contains(&fk))
                {
                    row.clear(&relation.key_column);
                }
            }
        }

        Ok(())
    }

    fn is_key_column(&self, entity: &str, column: &str) -> bool {
        self.policy
            .relations()
            .any(|r| r.owner == entity && r.key_column == column)
    }
}
