//! Property test: policy resolution is total.
//!
//! For any structurally valid declaration set, resolution either rejects the
//! whole configuration or assigns every declared relationship exactly one
//! owning side and one cascade class.

use flotsam_schema::{
    build::{EntityBuilder, SchemaBuilder},
    policy::MappingPolicy,
    types::{Cardinality, Cascade, Primitive},
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct RelDecl {
    target: usize,
    cardinality: Cardinality,
    inverse: bool,
    cascade: Option<Cascade>,
}

fn cardinality() -> impl Strategy<Value = Cardinality> {
    prop_oneof![
        Just(Cardinality::One),
        Just(Cardinality::Opt),
        Just(Cardinality::Many),
    ]
}

fn cascade() -> impl Strategy<Value = Option<Cascade>> {
    prop_oneof![
        Just(None),
        Just(Some(Cascade::None)),
        Just(Some(Cascade::SaveUpdate)),
        Just(Some(Cascade::All)),
        Just(Some(Cascade::AllDeleteOrphan)),
    ]
}

fn relations(entity_count: usize) -> impl Strategy<Value = Vec<RelDecl>> {
    prop::collection::vec(
        (0..entity_count, cardinality(), any::<bool>(), cascade()).prop_map(
            |(target, cardinality, inverse, cascade)| RelDecl {
                target,
                cardinality,
                // Scalar references cannot be inverse; keep declarations
                // structurally valid so build always succeeds.
                inverse: inverse && cardinality.is_collection(),
                cascade,
            },
        ),
        0..4,
    )
}

fn declaration_sets() -> impl Strategy<Value = Vec<Vec<RelDecl>>> {
    (1..4usize).prop_flat_map(|n| prop::collection::vec(relations(n), n))
}

fn entity_name(index: usize) -> String {
    format!("Entity{index}")
}

proptest! {
    #[test]
    fn resolution_assigns_exactly_one_class_per_relationship(decls in declaration_sets()) {
        let mut builder = SchemaBuilder::new();
        for (index, rels) in decls.iter().enumerate() {
            let mut entity = EntityBuilder::new(entity_name(index)).field("Name", Primitive::Text);
            for (rel_index, rel) in rels.iter().enumerate() {
                let field = format!("Rel{rel_index}");
                let target = entity_name(rel.target);
                entity = match rel.cardinality {
                    Cardinality::One => entity.references(field, target),
                    Cardinality::Opt => entity.references_opt(field, target),
                    Cardinality::Many => entity.has_many(field, target),
                };
                if rel.inverse {
                    entity = entity.inverse();
                }
                if let Some(cascade) = rel.cascade {
                    entity = entity.cascade(cascade);
                }
            }
            builder = builder.entity(entity);
        }

        let schema = builder.build().expect("structurally valid declarations");
        let declared: usize = decls.iter().map(Vec::len).sum();

        // Either the whole configuration is rejected, or every declared
        // relationship resolved to exactly one row.
        if let Ok(policy) = MappingPolicy::resolve(&schema) {
            prop_assert_eq!(policy.relations().count(), declared);

            for (index, rels) in decls.iter().enumerate() {
                for rel_index in 0..rels.len() {
                    let entity = entity_name(index);
                    let field = format!("Rel{rel_index}");
                    let resolved = policy.relation(&entity, &field);
                    prop_assert!(resolved.is_some(), "{}.{} did not resolve", entity, field);
                }
            }
        }
    }
}
