//! ## Crate layout
//! - `schema`: declarative nodes, builder, validation, and policy resolution.
//! - `core`: runtime row store, session, and the materializer interface.
//!
//! The `prelude` module mirrors the surface a caller needs to declare a
//! domain, resolve its mapping policy, and exercise cascade semantics.

pub use flotsam_core as core;
pub use flotsam_schema as schema;

mod error;

pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        db::{Row, Session, Store},
        materialize::{Materializer, MemoryMaterializer},
        types::{Timestamp, Ulid},
        value::Value,
    };
    pub use crate::schema::{
        build::{EntityBuilder, SchemaBuilder},
        node::Schema,
        policy::MappingPolicy,
        types::{Cardinality, Cascade, Primitive, Side},
    };
}
