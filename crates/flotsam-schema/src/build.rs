use crate::{
    err,
    error::ErrorTree,
    node::{Entity, Field, Relation, Schema},
    types::{Cardinality, Cascade, Primitive, Side},
    validate::validate_schema,
};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}

///
/// SchemaBuilder
///
/// Explicit registration surface for entity declarations. `build` validates
/// the whole declaration set once and returns an owned, immutable `Schema`;
/// any failure rejects the entire configuration.
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entities: Vec<Entity>,
    errs: ErrorTree,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entity declaration.
    #[must_use]
    pub fn entity(mut self, builder: EntityBuilder) -> Self {
        let (entity, errs) = builder.into_parts();
        self.errs.merge(errs);
        self.entities.push(entity);

        self
    }

    /// Validate the declaration set and freeze it into a `Schema`.
    pub fn build(self) -> Result<Schema, BuildError> {
        let schema = Schema::new(self.entities);

        let mut errs = self.errs;
        if let Err(tree) = validate_schema(&schema) {
            errs.merge(tree);
        }
        errs.result().map_err(BuildError::Validation)?;

        Ok(schema)
    }
}

///
/// EntityBuilder
///
/// Fluent declaration of one entity. Modifiers (`column`, `inverse`,
/// `key_column`, `cascade`) apply to the most recently declared member;
/// misuse is recorded and surfaces at `SchemaBuilder::build`.
///

#[derive(Debug)]
pub struct EntityBuilder {
    name: String,
    fields: Vec<Field>,
    relations: Vec<Relation>,
    errs: ErrorTree,
}

impl EntityBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
            errs: ErrorTree::new(),
        }
    }

    /// Declare a scalar field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, primitive: Primitive) -> Self {
        self.fields.push(Field::new(name, primitive));

        self
    }

    /// Override the column name of the most recent field.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        match self.fields.last_mut() {
            Some(field) => field.column = Some(column),
            None => err!(
                self.errs,
                "entity '{}': column override '{column}' has no preceding field",
                self.name
            ),
        }

        self
    }

    /// Declare a required scalar reference (foreign key on this entity).
    #[must_use]
    pub fn references(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::One)
    }

    /// Declare an optional scalar reference (foreign key on this entity).
    #[must_use]
    pub fn references_opt(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::Opt)
    }

    /// Declare a collection (foreign key on the target entity).
    #[must_use]
    pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::Many)
    }

    /// Mark the most recent relation as a read-only navigation view.
    #[must_use]
    pub fn inverse(mut self) -> Self {
        match self.relations.last_mut() {
            Some(relation) => relation.side = Side::Inverse,
            None => err!(
                self.errs,
                "entity '{}': inverse modifier has no preceding relation",
                self.name
            ),
        }

        self
    }

    /// Override the foreign-key column of the most recent relation.
    #[must_use]
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        match self.relations.last_mut() {
            Some(relation) => relation.key_column = Some(column),
            None => err!(
                self.errs,
                "entity '{}': key column override '{column}' has no preceding relation",
                self.name
            ),
        }

        self
    }

    /// Override the cascade class of the most recent relation.
    #[must_use]
    pub fn cascade(mut self, cascade: Cascade) -> Self {
        match self.relations.last_mut() {
            Some(relation) => relation.cascade = Some(cascade),
            None => err!(
                self.errs,
                "entity '{}': cascade modifier has no preceding relation",
                self.name
            ),
        }

        self
    }

    fn relation(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.relations.push(Relation::new(name, target, cardinality));

        self
    }

    pub(crate) fn into_parts(self) -> (Entity, ErrorTree) {
        let entity = Entity {
            name: self.name,
            fields: self.fields,
            relations: self.relations,
        };

        (entity, self.errs)
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaBuilder;
    use crate::{build::EntityBuilder, types::Primitive};

    #[test]
    fn builds_a_minimal_schema() {
        let schema = SchemaBuilder::new()
            .entity(EntityBuilder::new("Island").field("Name", Primitive::Text))
            .build()
            .unwrap();

        assert_eq!(schema.len(), 1);
        assert!(schema.get_entity("Island").is_some());
    }

    #[test]
    fn modifier_without_member_is_rejected() {
        let err = SchemaBuilder::new()
            .entity(EntityBuilder::new("Island").inverse())
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("no preceding relation"));
    }

    #[test]
    fn duplicate_entity_names_are_rejected() {
        let err = SchemaBuilder::new()
            .entity(EntityBuilder::new("Island"))
            .entity(EntityBuilder::new("Island"))
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("duplicate entity name"));
    }

    #[test]
    fn unknown_relation_target_is_rejected() {
        let err = SchemaBuilder::new()
            .entity(EntityBuilder::new("Person").references_opt("Island", "Island"))
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("unknown entity"));
    }
}
