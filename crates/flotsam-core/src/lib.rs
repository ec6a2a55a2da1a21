//! ## Crate layout
//! - `types`: identity and timestamp primitives.
//! - `value`: the closed scalar value set rows are made of.
//! - `db`: in-memory row store and the explicit save/flush/delete session.
//! - `materialize`: the schema-materializer interface and in-memory double.

pub mod db;
pub mod materialize;
pub mod types;
pub mod value;

use crate::{
    db::{SessionError, StoreError},
    materialize::MaterializeError,
};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        db::{Session, Store},
        materialize::{Materializer, MemoryMaterializer},
        types::{Timestamp, Ulid},
        value::Value,
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    SessionError(#[from] SessionError),

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    MaterializeError(#[from] MaterializeError),
}
