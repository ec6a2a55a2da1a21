use crate::{
    err,
    error::ErrorTree,
    node::{Field, Relation},
    validate::naming,
};
use serde::Serialize;
use std::collections::BTreeSet;

///
/// Entity
///

#[derive(Clone, Debug, Serialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
    pub relations: Vec<Relation>,
}

impl Entity {
    #[must_use]
    /// Look up a scalar field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    /// Look up a relationship declaration by name.
    pub fn get_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Structural + local invariants; relationship pairing is a global pass.
    pub(crate) fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        naming::validate_entity_ident(&self.name, &mut errs);
        for field in &self.fields {
            naming::validate_member_ident(&self.name, &field.name, &mut errs);
            if let Some(column) = &field.column {
                naming::validate_member_ident(&self.name, column, &mut errs);
            }
        }
        for relation in &self.relations {
            naming::validate_member_ident(&self.name, &relation.name, &mut errs);
            if let Some(column) = &relation.key_column {
                naming::validate_member_ident(&self.name, column, &mut errs);
            }

            // Scalar references hold the foreign key; they cannot be inverse.
            if relation.cardinality.is_scalar() && relation.side.is_inverse() {
                err!(
                    errs,
                    "relation '{}' is a scalar reference and cannot be marked inverse",
                    relation.route(&self.name)
                );
            }
        }

        let mut seen = BTreeSet::new();
        for name in self
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.relations.iter().map(|r| r.name.as_str()))
        {
            if !seen.insert(name) {
                err!(errs, "duplicate member '{name}' on entity '{}'", self.name);
            }
        }

        errs.result()
    }
}
