use crate::{
    MAX_ENTITY_NAME_LEN, MAX_FIELD_NAME_LEN, err,
    error::ErrorTree,
    node::{Entity, Schema},
};
use std::collections::BTreeMap;

/// Detect duplicate entity names across the whole declaration set.
pub(crate) fn validate_entity_naming(schema: &Schema, errs: &mut ErrorTree) {
    let mut seen: BTreeMap<&str, &Entity> = BTreeMap::new();

    for entity in schema.entities() {
        if seen.insert(&entity.name, entity).is_some() {
            err!(errs, "duplicate entity name '{}'", entity.name);
        }
    }
}

/// Identifier rules for entity names.
pub(crate) fn validate_entity_ident(name: &str, errs: &mut ErrorTree) {
    validate_ident(name, MAX_ENTITY_NAME_LEN, errs, || {
        format!("entity name '{name}'")
    });
}

/// Identifier rules for field, relation, and column names.
pub(crate) fn validate_member_ident(entity: &str, name: &str, errs: &mut ErrorTree) {
    validate_ident(name, MAX_FIELD_NAME_LEN, errs, || {
        format!("member name '{entity}.{name}'")
    });
}

// Shared identifier charset and length rules. Reserved words are NOT
// rejected here: every physical column is emitted delimited, so names
// like 'Key' or 'Group' are legal identifiers.
fn validate_ident(name: &str, max_len: usize, errs: &mut ErrorTree, what: impl Fn() -> String) {
    if name.is_empty() {
        err!(errs, "{} is empty", what());
        return;
    }
    if name.len() > max_len {
        err!(errs, "{} exceeds {max_len} characters", what());
    }

    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_ok || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        err!(
            errs,
            "{} must start with a letter and contain only ASCII letters, digits, or underscores",
            what()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::validate_entity_ident;
    use crate::error::ErrorTree;

    #[test]
    fn accepts_reserved_words_as_identifiers() {
        for name in ["Key", "Group", "Order"] {
            let mut errs = ErrorTree::new();
            validate_entity_ident(name, &mut errs);
            assert!(errs.is_empty(), "'{name}' should be a legal identifier");
        }
    }

    #[test]
    fn rejects_bad_identifiers() {
        for name in ["", "1Island", "Is land", "Is-land"] {
            let mut errs = ErrorTree::new();
            validate_entity_ident(name, &mut errs);
            assert!(!errs.is_empty(), "'{name}' should be rejected");
        }
    }
}
