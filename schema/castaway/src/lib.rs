//! Castaway demo schema fixtures.
//!
//! Islands hold castaways, castaways open bottles, bottles carry messages.
//! The relationship set exercises every cascade class: owning and inverse
//! collections, save-update references, an unowned favorite, and a
//! delete-orphan collection.

use flotsam::prelude::*;

/// Foreign-key column of the bottle-opener relationship.
pub const OPENED_BY_KEY: &str = "OpenedBy_id";

/// Declare the castaway domain and validate it into a schema.
pub fn castaway_schema() -> Result<Schema, flotsam::schema::build::BuildError> {
    SchemaBuilder::new()
        .entity(
            EntityBuilder::new("Island")
                .field("Name", Primitive::Text)
                // Navigation only; the person owns this side.
                .has_many("Castaways", "Person")
                .inverse(),
        )
        .entity(
            EntityBuilder::new("Person")
                // A castaway can only be on one island.
                .references_opt("Island", "Island")
                // Loving a message does not tie its fate to yours.
                .references_opt("FavoriteMessage", "Message")
                .cascade(Cascade::None)
                // A bottle can only be opened by one castaway.
                .has_many("BottlesOpened", "Bottle")
                .inverse()
                .key_column(OPENED_BY_KEY),
        )
        .entity(
            EntityBuilder::new("Bottle")
                // Who originally opened this bottle. Null if not yet opened.
                .references_opt("OpenedBy", "Person")
                // Sometimes people send more than one, you know!
                .has_many("Messages", "Message")
                .cascade(Cascade::AllDeleteOrphan),
        )
        .entity(
            EntityBuilder::new("Message")
                .field("Text", Primitive::Text)
                .field("DateAdded", Primitive::Timestamp),
        )
        .build()
}

///
/// Row fixtures
///

pub mod rows {
    use flotsam::prelude::*;

    #[must_use]
    pub fn island(name: &str) -> Row {
        Row::new().with("Name", name)
    }

    #[must_use]
    pub fn person(island: Option<Ulid>) -> Row {
        Row::new().with("Island_id", island)
    }

    #[must_use]
    pub fn bottle(opened_by: Option<Ulid>) -> Row {
        Row::new().with(super::OPENED_BY_KEY, opened_by)
    }

    #[must_use]
    pub fn message(bottle: Ulid, text: &str, date_added: Timestamp) -> Row {
        Row::new()
            .with("Bottle_id", bottle)
            .with("Text", text)
            .with("DateAdded", date_added)
    }
}
