use crate::types::{Cardinality, Cascade, Side};
use serde::Serialize;

///
/// Relation
///
/// One relationship declaration on an entity. Scalar references (`One`/`Opt`)
/// place the foreign key on the declaring entity and are always owning.
/// Collections (`Many`) place the foreign key on the target; an `Inverse`
/// collection is a read-only navigation view over an owning scalar reference
/// declared on the target entity.
///

#[derive(Clone, Debug, Serialize)]
pub struct Relation {
    pub name: String,
    pub target: String,
    pub cardinality: Cardinality,
    pub side: Side,

    /// Foreign-key column override (e.g. `OpenedBy_id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,

    /// Cascade override; when absent the shape-derived default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade: Option<Cascade>,
}

impl Relation {
    #[must_use]
    pub fn new(name: impl Into<String>, target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality,
            side: Side::Owning,
            key_column: None,
            cascade: None,
        }
    }

    /// `Entity.Field` route used to identify the relationship in errors.
    #[must_use]
    pub fn route(&self, entity: &str) -> String {
        format!("{entity}.{}", self.name)
    }
}
