use crate::node::Entity;
use serde::Serialize;

///
/// Schema
///
/// Immutable, validated set of entity declarations in registration order.
/// Produced only by `SchemaBuilder::build`; holding a `Schema` means
/// structural validation has already passed.
///

#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    entities: Vec<Entity>,
}

impl Schema {
    pub(crate) const fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Entities in registration order (deterministic for staged passes).
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
