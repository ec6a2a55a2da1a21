use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// Cardinality
///

#[derive(
    Clone, Copy, Default, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize,
)]
pub enum Cardinality {
    #[default]
    One,
    Opt,
    Many,
}

impl Cardinality {
    /// Scalar references hold the foreign key on the declaring entity.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::One | Self::Opt)
    }

    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Many)
    }
}

///
/// Side
///
/// Which side of a bidirectional relationship is authoritative for writes.
/// Inverse sides are read-only navigation views and never issue writes for
/// the relationship.
///

#[derive(
    Clone, Copy, Default, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize,
)]
pub enum Side {
    #[default]
    Owning,
    Inverse,
}

impl Side {
    #[must_use]
    pub const fn is_inverse(self) -> bool {
        matches!(self, Self::Inverse)
    }
}

///
/// Cascade
///
/// Closed set of cascade classes. Every resolved relationship carries exactly
/// one; there is no partial or negotiated cascade.
///

#[derive(
    Clone, Copy, Default, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize,
)]
pub enum Cascade {
    #[default]
    None,
    SaveUpdate,
    All,
    AllDeleteOrphan,
}

impl Cascade {
    /// Does a save/update on the parent propagate across this relationship?
    #[must_use]
    pub const fn cascades_save(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Does deleting the parent delete related entities?
    #[must_use]
    pub const fn cascades_delete(self) -> bool {
        matches!(self, Self::All | Self::AllDeleteOrphan)
    }

    /// Is an entity removed from its owning collection itself deleted?
    #[must_use]
    pub const fn removes_orphans(self) -> bool {
        matches!(self, Self::AllDeleteOrphan)
    }
}

///
/// Primitive
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize,
)]
#[remain::sorted]
pub enum Primitive {
    Bool,
    Float,
    Int,
    Text,
    Timestamp,
    Ulid,
    Unit,
}

impl Primitive {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Int)
    }

    // both Ord and PartialOrd
    #[must_use]
    pub const fn supports_ord(self) -> bool {
        !matches!(self, Self::Unit)
    }
}

#[cfg(test)]
mod tests {
    use super::Cascade;

    #[test]
    fn cascade_classes_are_disjoint_on_delete() {
        assert!(!Cascade::None.cascades_delete());
        assert!(!Cascade::SaveUpdate.cascades_delete());
        assert!(Cascade::All.cascades_delete());
        assert!(Cascade::AllDeleteOrphan.cascades_delete());
    }

    #[test]
    fn only_delete_orphan_removes_orphans() {
        assert!(Cascade::AllDeleteOrphan.removes_orphans());
        assert!(!Cascade::All.removes_orphans());
        assert!(!Cascade::SaveUpdate.removes_orphans());
        assert!(!Cascade::None.removes_orphans());
    }
}
