use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

///
/// Timestamp
///
/// UTC instant stored with full precision, rendered and serialized as
/// RFC 3339.
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from_unix_seconds(seconds: i64) -> Result<Self, time::error::ComponentRange> {
        OffsetDateTime::from_unix_timestamp(seconds).map(Self)
    }

    #[must_use]
    pub const fn unix_seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Shift backwards by whole days, saturating at the representable range.
    #[must_use]
    pub fn sub_days(self, days: i64) -> Self {
        Self(self.0.saturating_sub(Duration::days(days)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rendered = self
            .0
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&rendered)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let parsed =
            OffsetDateTime::parse(&encoded, &Rfc3339).map_err(serde::de::Error::custom)?;

        Ok(Self(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::Timestamp;

    #[test]
    fn renders_rfc3339() {
        let ts = Timestamp::from_unix_seconds(0).unwrap();
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn sub_days_moves_backwards() {
        let now = Timestamp::now();
        let then = now.sub_days(730);
        assert!(then < now);
    }

    #[test]
    fn serde_round_trip() {
        let ts = Timestamp::from_unix_seconds(1_700_000_000).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
