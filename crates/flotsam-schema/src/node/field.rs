use crate::types::Primitive;
use serde::Serialize;

///
/// Field
///
/// One scalar property of an entity. The physical column name is resolved
/// from the field name (or the explicit override) and is always emitted
/// delimited, so reserved words survive unchanged.
///

#[derive(Clone, Debug, Serialize)]
pub struct Field {
    pub name: String,
    pub primitive: Primitive,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            column: None,
        }
    }

    /// Resolve the logical column name used for schema identity.
    #[must_use]
    pub fn resolved_column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}
