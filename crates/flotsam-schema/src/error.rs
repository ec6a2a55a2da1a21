use std::fmt;

///
/// ErrorTree
///
/// Flat aggregation of validation failures, collected in pass order so a
/// single resolution run reports every problem at once. An empty tree is
/// success; a non-empty tree is returned whole and no partial result escapes.
///

#[derive(Debug, Default)]
pub struct ErrorTree {
    errors: Vec<String>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one failure.
    pub fn add(&mut self, err: impl fmt::Display) {
        self.errors.push(err.to_string());
    }

    /// Fold another tree's failures into this one, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate recorded failure messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }

    /// Consume the tree: `Ok(())` when empty, otherwise the full tree.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} error(s)", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  - {err}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

///
/// err!
/// Format and record a failure on an `ErrorTree`.
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::ErrorTree;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());
    }

    #[test]
    fn tree_reports_every_failure() {
        let mut errs = ErrorTree::new();
        err!(errs, "first {}", 1);
        err!(errs, "second");

        let tree = errs.result().unwrap_err();
        assert_eq!(tree.len(), 2);

        let rendered = tree.to_string();
        assert!(rendered.contains("first 1"));
        assert!(rendered.contains("second"));
    }
}
