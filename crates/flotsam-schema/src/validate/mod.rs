//! Schema validation orchestration and shared helpers.

pub(crate) mod naming;
pub(crate) mod relation;

use crate::{error::ErrorTree, node::Schema};

/// Run structural schema validation in a staged, deterministic order.
///
/// Relationship pairing, ownership, and cascade invariants are enforced
/// later, at policy resolution; this stage covers everything a single
/// declaration set can violate on its own.
pub(crate) fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    // Phase 1: validate each node (structural + local invariants).
    let mut errors = validate_nodes(schema);

    // Phase 2: enforce schema-wide invariants.
    validate_global(schema, &mut errors);

    errors.result()
}

// Validate all nodes, aggregating every local failure.
fn validate_nodes(schema: &Schema) -> ErrorTree {
    let mut errors = ErrorTree::new();
    for entity in schema.entities() {
        if let Err(errs) = entity.validate() {
            errors.merge(errs);
        }
    }

    errors
}

// Run global validation passes that require a full schema view.
fn validate_global(schema: &Schema, errors: &mut ErrorTree) {
    naming::validate_entity_naming(schema, errors);
    relation::validate_relation_targets(schema, errors);
}
