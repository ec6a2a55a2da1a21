use derive_more::{Deref, DerefMut, Display, FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// UlidError
///

#[derive(Debug, ThisError)]
pub enum UlidError {
    #[error("invalid ulid string")]
    InvalidString,
}

///
/// Ulid
///
/// Entity identity: globally unique, randomly generated at construction,
/// immutable thereafter.
///

#[derive(
    Clone, Copy, Debug, Deref, DerefMut, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd,
)]
#[repr(transparent)]
pub struct Ulid(WrappedUlid);

impl Ulid {
    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    /// Generate a ULID with the current timestamp and a random value.
    #[must_use]
    pub fn generate() -> Self {
        Self(WrappedUlid::new())
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(WrappedUlid::from_bytes(bytes))
    }

    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(WrappedUlid::from_bytes(n.to_be_bytes()))
    }

    pub fn from_string(encoded: &str) -> Result<Self, UlidError> {
        let this = WrappedUlid::from_string(encoded).map_err(|_| UlidError::InvalidString)?;

        Ok(Self(this))
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Ulid {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<WrappedUlid> for Ulid {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

impl Serialize for Ulid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;

        Self::from_string(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Ulid;

    #[test]
    fn generated_ids_are_unique() {
        let a = Ulid::generate();
        let b = Ulid::generate();
        assert_ne!(a, b);
        assert!(!a.is_nil());
    }

    #[test]
    fn round_trips_through_strings() {
        let id = Ulid::generate();
        let parsed = Ulid::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_garbage_strings() {
        assert!(Ulid::from_string("not a ulid").is_err());
    }
}
