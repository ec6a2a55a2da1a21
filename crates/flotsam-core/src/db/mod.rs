//! Runtime persistence: an in-memory row store and the explicit unit of work
//! that applies the resolved mapping policy's cascade semantics.

mod row;
mod session;
mod store;

pub use row::Row;
pub use session::{Session, SessionError};
pub use store::{Store, StoreError};
