use flotsam_core::{
    db::{SessionError, StoreError},
    materialize::MaterializeError,
};
use flotsam_schema::{build::BuildError, policy::PolicyError};
use thiserror::Error as ThisError;

///
/// Error
///
/// One public error surface over the schema and runtime layers, so callers
/// can thread `?` through a whole declare-resolve-materialize-persist run.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
