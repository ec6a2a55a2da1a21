use crate::{err, error::ErrorTree, node::Schema};

/// Every relationship declaration must target a known entity.
pub(crate) fn validate_relation_targets(schema: &Schema, errs: &mut ErrorTree) {
    for entity in schema.entities() {
        for relation in &entity.relations {
            if schema.get_entity(&relation.target).is_none() {
                err!(
                    errs,
                    "relation '{}' targets unknown entity '{}'",
                    relation.route(&entity.name),
                    relation.target
                );
            }
        }
    }
}
