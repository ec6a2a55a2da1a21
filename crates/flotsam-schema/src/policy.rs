//! Mapping-policy resolution.
//!
//! A single pass over a validated [`Schema`] that decides, for every declared
//! relationship, which entity holds the foreign key, which cascade class
//! applies, and which physical column carries the key. Resolution is total:
//! either every relationship resolves, or the whole configuration is rejected
//! with every failure reported.

use crate::{
    err,
    error::ErrorTree,
    node::{Entity, Relation, Schema},
    types::{Cardinality, Cascade, Primitive},
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// PolicyError
///

#[derive(Debug, ThisError)]
pub enum PolicyError {
    #[error("policy resolution failed: {0}")]
    Resolution(ErrorTree),
}

/// Wrap a physical identifier in the universal delimiter convention.
///
/// Applied to every table and column name unconditionally, so property names
/// that collide with reserved words ('Key', 'Group') never need a special
/// case.
#[must_use]
pub fn delimit(name: &str) -> String {
    format!("[{name}]")
}

///
/// ResolvedRelation
///
/// One relationship after resolution: exactly one owning side, one cascade
/// class, one foreign-key column. `owner` is the entity whose table carries
/// the key; `references` is the entity the key points at.
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedRelation {
    pub source: String,
    pub field: String,
    pub target: String,
    pub cardinality: Cardinality,
    pub inverse: bool,
    pub owner: String,
    pub references: String,
    pub key_column: String,
    pub cascade: Cascade,
}

impl ResolvedRelation {
    /// `Entity.Field` route identifying this relationship.
    #[must_use]
    pub fn route(&self) -> String {
        format!("{}.{}", self.source, self.field)
    }

    /// Physical (delimited) foreign-key column name.
    #[must_use]
    pub fn delimited_key_column(&self) -> String {
        delimit(&self.key_column)
    }

    /// Inverse sides never issue writes for the relationship.
    #[must_use]
    pub const fn issues_writes(&self) -> bool {
        !self.inverse
    }
}

///
/// ResolvedColumn
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedColumn {
    pub property: String,
    /// Physical column name, already delimited.
    pub column: String,
    pub primitive: Primitive,
}

///
/// ResolvedForeignKey
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedForeignKey {
    /// Physical column name, already delimited.
    pub column: String,
    pub references: String,
    /// Route of the relationship this key persists.
    pub relation: String,
}

///
/// ResolvedEntity
///

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedEntity {
    pub entity: String,
    /// Physical table name, already delimited.
    pub table: String,
    /// Identity column, always present, never reassigned.
    pub id_column: String,
    pub columns: Vec<ResolvedColumn>,
    pub foreign_keys: Vec<ResolvedForeignKey>,
}

///
/// MappingPolicy
///
/// The resolved mapping table handed to a schema materializer. Construction
/// is deterministic and side-effect-free; a `MappingPolicy` only exists if
/// resolution succeeded in full.
///

#[derive(Clone, Debug, Serialize)]
pub struct MappingPolicy {
    entities: Vec<ResolvedEntity>,
    relations: Vec<ResolvedRelation>,
}

/// Identity column shared by every entity.
pub const ID_COLUMN: &str = "Id";

impl MappingPolicy {
    /// Resolve the mapping policy for a validated schema.
    ///
    /// Staged passes, all failures aggregated; no partial policy is ever
    /// returned.
    pub fn resolve(schema: &Schema) -> Result<Self, PolicyError> {
        let mut errs = ErrorTree::new();

        // Phase 1: assign ownership and pair inverse views with their
        // owning counterparts.
        let relations = resolve_relations(schema, &mut errs);

        // Phase 2: assemble per-entity tables and reject column collisions.
        let entities = resolve_entities(schema, &relations, &mut errs);

        // Phase 3: reject delete-cascade cycles before anything can recurse.
        detect_cascade_cycles(&relations, &mut errs);

        errs.result().map_err(PolicyError::Resolution)?;

        Ok(Self {
            entities,
            relations,
        })
    }

    /// Look up one resolved relationship by its declaring entity and field.
    #[must_use]
    pub fn relation(&self, entity: &str, field: &str) -> Option<&ResolvedRelation> {
        self.relations
            .iter()
            .find(|r| r.source == entity && r.field == field)
    }

    /// All resolved relationships, in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &ResolvedRelation> {
        self.relations.iter()
    }

    /// Resolved relationships declared by `entity`.
    pub fn relations_from<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedRelation> {
        self.relations.iter().filter(move |r| r.source == entity)
    }

    /// Resolved relationships whose foreign key points at `entity`.
    pub fn relations_referencing<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedRelation> {
        self.relations
            .iter()
            .filter(move |r| r.references == entity)
    }

    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&ResolvedEntity> {
        self.entities.iter().find(|e| e.entity == name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &ResolvedEntity> {
        self.entities.iter()
    }
}

// ─────────────────────────────────────────────
// Phase 1: ownership and pairing
// ─────────────────────────────────────────────

fn resolve_relations(schema: &Schema, errs: &mut ErrorTree) -> Vec<ResolvedRelation> {
    let mut resolved = Vec::new();

    for entity in schema.entities() {
        for relation in &entity.relations {
            if schema.get_entity(&relation.target).is_none() {
                // Reported by structural validation; skip quietly here.
                continue;
            }

            match relation.cardinality {
                Cardinality::One | Cardinality::Opt => {
                    resolved.push(resolve_scalar(entity, relation));
                }
                Cardinality::Many if relation.side.is_inverse() => {
                    if let Some(r) = resolve_inverse_collection(schema, entity, relation, errs) {
                        resolved.push(r);
                    }
                }
                Cardinality::Many => {
                    if let Some(r) = resolve_owning_collection(schema, entity, relation, errs) {
                        resolved.push(r);
                    }
                }
            }
        }
    }

    resolved
}

// A scalar reference holds the foreign key on the declaring entity.
fn resolve_scalar(entity: &Entity, relation: &Relation) -> ResolvedRelation {
    ResolvedRelation {
        source: entity.name.clone(),
        field: relation.name.clone(),
        target: relation.target.clone(),
        cardinality: relation.cardinality,
        inverse: false,
        owner: entity.name.clone(),
        references: relation.target.clone(),
        key_column: relation
            .key_column
            .clone()
            .unwrap_or_else(|| default_key_column(&relation.name)),
        cascade: relation.cascade.unwrap_or(Cascade::SaveUpdate),
    }
}

// An owning collection writes the foreign key it places on the target.
// It conflicts with any scalar reference on the target pointing back:
// exactly one side of a bidirectional relationship may be authoritative.
fn resolve_owning_collection(
    schema: &Schema,
    entity: &Entity,
    relation: &Relation,
    errs: &mut ErrorTree,
) -> Option<ResolvedRelation> {
    let rivals = scalar_counterparts(schema, &relation.target, &entity.name);
    if let Some(rival) = rivals.first() {
        err!(
            errs,
            "conflicting ownership: '{}' and '{}' both claim the foreign key between '{}' and '{}'; mark one side inverse",
            relation.route(&entity.name),
            rival.route(&relation.target),
            entity.name,
            relation.target
        );
        return None;
    }

    Some(ResolvedRelation {
        source: entity.name.clone(),
        field: relation.name.clone(),
        target: relation.target.clone(),
        cardinality: relation.cardinality,
        inverse: false,
        owner: relation.target.clone(),
        references: entity.name.clone(),
        key_column: relation
            .key_column
            .clone()
            .unwrap_or_else(|| default_key_column(&entity.name)),
        cascade: relation.cascade.unwrap_or(Cascade::All),
    })
}

// An inverse collection is a navigation view over an owning scalar reference
// declared on the target. The pairing must be unambiguous.
fn resolve_inverse_collection(
    schema: &Schema,
    entity: &Entity,
    relation: &Relation,
    errs: &mut ErrorTree,
) -> Option<ResolvedRelation> {
    let route = relation.route(&entity.name);
    let counterparts = scalar_counterparts(schema, &relation.target, &entity.name);

    let paired = match (&relation.key_column, counterparts.as_slice()) {
        (_, []) => {
            err!(
                errs,
                "inverse relation '{route}' has no owning scalar reference on '{}'",
                relation.target
            );
            return None;
        }
        (Some(column), candidates) => {
            let Some(found) = candidates
                .iter()
                .find(|c| key_column_of(c) == column.as_str())
            else {
                err!(
                    errs,
                    "inverse relation '{route}' key column '{column}' matches no owning reference on '{}'",
                    relation.target
                );
                return None;
            };
            found
        }
        (None, [only]) => only,
        (None, candidates) => {
            let routes = candidates
                .iter()
                .map(|c| c.route(&relation.target))
                .collect::<Vec<_>>()
                .join(", ");
            err!(
                errs,
                "inverse relation '{route}' is ambiguous: owning candidates are {routes}; disambiguate with a key column"
            );
            return None;
        }
    };

    Some(ResolvedRelation {
        source: entity.name.clone(),
        field: relation.name.clone(),
        target: relation.target.clone(),
        cardinality: relation.cardinality,
        inverse: true,
        owner: relation.target.clone(),
        references: entity.name.clone(),
        key_column: key_column_of(paired),
        cascade: relation.cascade.unwrap_or(Cascade::None),
    })
}

// Owning scalar references on `entity` that point back at `references`.
fn scalar_counterparts<'a>(
    schema: &'a Schema,
    entity: &str,
    references: &str,
) -> Vec<&'a Relation> {
    schema.get_entity(entity).map_or_else(Vec::new, |e| {
        e.relations
            .iter()
            .filter(|r| r.cardinality.is_scalar() && r.target == references)
            .collect()
    })
}

fn key_column_of(relation: &Relation) -> String {
    relation
        .key_column
        .clone()
        .unwrap_or_else(|| default_key_column(&relation.name))
}

fn default_key_column(name: &str) -> String {
    format!("{name}_id")
}

// ─────────────────────────────────────────────
// Phase 2: per-entity table assembly
// ─────────────────────────────────────────────

fn resolve_entities(
    schema: &Schema,
    relations: &[ResolvedRelation],
    errs: &mut ErrorTree,
) -> Vec<ResolvedEntity> {
    schema
        .entities()
        .map(|entity| resolve_entity(entity, relations, errs))
        .collect()
}

fn resolve_entity(
    entity: &Entity,
    relations: &[ResolvedRelation],
    errs: &mut ErrorTree,
) -> ResolvedEntity {
    let mut used: BTreeMap<String, String> = BTreeMap::new();
    used.insert(ID_COLUMN.to_string(), format!("{}.Id", entity.name));

    let mut columns = Vec::new();
    for field in &entity.fields {
        let raw = field.resolved_column().to_string();
        claim_column(&entity.name, &raw, &field.name, &mut used, errs);
        columns.push(ResolvedColumn {
            property: field.name.clone(),
            column: delimit(&raw),
            primitive: field.primitive,
        });
    }

    // Inverse views share the column their owning counterpart claimed;
    // only writing sides contribute a physical key column.
    let mut foreign_keys = Vec::new();
    for relation in relations
        .iter()
        .filter(|r| r.owner == entity.name && r.issues_writes())
    {
        claim_column(
            &entity.name,
            &relation.key_column,
            &relation.route(),
            &mut used,
            errs,
        );
        foreign_keys.push(ResolvedForeignKey {
            column: relation.delimited_key_column(),
            references: relation.references.clone(),
            relation: relation.route(),
        });
    }

    ResolvedEntity {
        entity: entity.name.clone(),
        table: delimit(&entity.name),
        id_column: delimit(ID_COLUMN),
        columns,
        foreign_keys,
    }
}

fn claim_column(
    entity: &str,
    column: &str,
    claimant: &str,
    used: &mut BTreeMap<String, String>,
    errs: &mut ErrorTree,
) {
    if let Some(prev) = used.insert(column.to_string(), claimant.to_string()) {
        err!(
            errs,
            "column '{column}' on table '{entity}' is claimed by both '{prev}' and '{claimant}'"
        );
    }
}

// ─────────────────────────────────────────────
// Phase 3: delete-cascade cycle detection
// ─────────────────────────────────────────────

// A cycle in the delete-cascading relation graph would recurse forever;
// reject the configuration instead of silently picking a side.
fn detect_cascade_cycles(relations: &[ResolvedRelation], errs: &mut ErrorTree) {
    let mut edges: BTreeMap<&str, Vec<&ResolvedRelation>> = BTreeMap::new();
    for relation in relations.iter().filter(|r| r.cascade.cascades_delete()) {
        edges.entry(&relation.source).or_default().push(relation);
    }

    let mut done: BTreeSet<&str> = BTreeSet::new();
    for &start in edges.keys().collect::<Vec<_>>() {
        if done.contains(start) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        walk_cascade(start, &edges, &mut path, &mut done, errs);
    }
}

fn walk_cascade<'a>(
    node: &'a str,
    edges: &BTreeMap<&'a str, Vec<&'a ResolvedRelation>>,
    path: &mut Vec<&'a str>,
    done: &mut BTreeSet<&'a str>,
    errs: &mut ErrorTree,
) {
    if let Some(pos) = path.iter().position(|&n| n == node) {
        let cycle = path[pos..]
            .iter()
            .chain(std::iter::once(&node))
            .copied()
            .collect::<Vec<_>>()
            .join(" -> ");
        err!(errs, "delete cascade cycle: {cycle}");
        return;
    }
    if done.contains(node) {
        return;
    }

    path.push(node);
    for relation in edges.get(node).into_iter().flatten() {
        walk_cascade(&relation.target, edges, path, done, errs);
    }
    path.pop();
    done.insert(node);
}
