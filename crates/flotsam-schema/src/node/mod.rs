//! Declarative schema nodes.
//!
//! Nodes describe *what exists*: entities, their scalar fields, and their
//! relationship declarations. They carry no resolution results; ownership,
//! cascade classes, and physical column names are assigned by policy
//! resolution over a validated [`Schema`].

mod entity;
mod field;
mod relation;
mod schema;

pub use entity::Entity;
pub use field::Field;
pub use relation::Relation;
pub use schema::Schema;
