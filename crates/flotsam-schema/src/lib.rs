pub mod build;
pub mod error;
pub mod node;
pub mod policy;
pub mod types;
pub mod validate;

/// Maximum length for entity schema identifiers.
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// Maximum length for field and relation schema identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

use crate::{build::BuildError, policy::PolicyError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        build::{EntityBuilder, SchemaBuilder},
        err,
        error::ErrorTree,
        node::{Entity, Field, Relation, Schema},
        policy::{MappingPolicy, ResolvedRelation},
        types::{Cardinality, Cascade, Primitive, Side},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    PolicyError(#[from] PolicyError),
}
