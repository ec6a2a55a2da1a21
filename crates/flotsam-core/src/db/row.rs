use crate::{types::Ulid, value::Value};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Row
///
/// One physical row: a generated identity plus scalar values keyed by
/// column name (field names for properties, key columns for foreign keys).
/// The identity is assigned at construction and never reassigned.
///

#[derive(Clone, Debug, Serialize)]
pub struct Row {
    id: Ulid,
    values: BTreeMap<String, Value>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Ulid::generate(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Ulid {
        self.id
    }

    /// Builder-style setter for fixture construction.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);

        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Null out a column (used when a referenced row is deleted).
    pub(crate) fn clear(&mut self, column: &str) {
        if let Some(value) = self.values.get_mut(column) {
            *value = Value::Null;
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Foreign-key read: `None` when the column is absent or null.
    #[must_use]
    pub fn get_ulid(&self, column: &str) -> Option<Ulid> {
        self.values.get(column).and_then(Value::as_ulid)
    }

    /// Column values in name order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Row;
    use crate::{types::Ulid, value::Value};

    #[test]
    fn identity_is_generated_at_construction() {
        let row = Row::new();
        assert!(!row.id().is_nil());
        assert_ne!(row.id(), Row::new().id());
    }

    #[test]
    fn clear_nulls_a_set_column() {
        let mut row = Row::new().with("OpenedBy_id", Ulid::generate());
        assert!(row.get_ulid("OpenedBy_id").is_some());

        row.clear("OpenedBy_id");
        assert_eq!(row.get("OpenedBy_id"), Some(&Value::Null));
        assert!(row.get_ulid("OpenedBy_id").is_none());
    }
}
