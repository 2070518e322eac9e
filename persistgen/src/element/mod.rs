//! The host element model, seen through what the processing core needs.
//!
//! The host compiler owns elements (classes, methods, fields). The core only
//! asks an element for its name, the warning categories it suppresses, the
//! converters it declares and whether it opts into dropping unused columns.

use crate::converters::ConverterDescriptor;
use std::fmt;

/// An element under analysis.
pub trait Element: fmt::Debug + Send + Sync {
    /// Returns a display name used to attribute diagnostics.
    fn name(&self) -> &str;

    /// Returns the raw warning keys the element suppresses.
    fn suppressed_warnings(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns the converters declared directly on the element.
    fn type_converters(&self) -> Vec<ConverterDescriptor> {
        Vec::new()
    }

    /// Returns true if the element carries the drop-unused-columns marker.
    fn drops_unused_columns(&self) -> bool {
        false
    }
}

/// A plain element description for hosts that pre-compute annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredElement {
    name: String,
    suppressed: Vec<String>,
    converters: Vec<ConverterDescriptor>,
    drops_unused_columns: bool,
}

impl DeclaredElement {
    /// Creates an element with no annotations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a suppressed warning key.
    #[must_use]
    pub fn suppressing(mut self, key: impl Into<String>) -> Self {
        self.suppressed.push(key.into());
        self
    }

    /// Adds a declared converter.
    #[must_use]
    pub fn with_converter(mut self, converter: ConverterDescriptor) -> Self {
        self.converters.push(converter);
        self
    }

    /// Marks the element as dropping unused columns.
    #[must_use]
    pub fn dropping_unused_columns(mut self) -> Self {
        self.drops_unused_columns = true;
        self
    }
}

impl Element for DeclaredElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn suppressed_warnings(&self) -> Vec<String> {
        self.suppressed.clone()
    }

    fn type_converters(&self) -> Vec<ConverterDescriptor> {
        self.converters.clone()
    }

    fn drops_unused_columns(&self) -> bool {
        self.drops_unused_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_element_builder() {
        let element = DeclaredElement::new("SongDao")
            .suppressing("PERSIST_CURSOR_MISMATCH")
            .with_converter(ConverterDescriptor::new("DateConverters", "Date", "Long"))
            .dropping_unused_columns();

        assert_eq!(element.name(), "SongDao");
        assert_eq!(element.suppressed_warnings(), vec!["PERSIST_CURSOR_MISMATCH"]);
        assert_eq!(element.type_converters().len(), 1);
        assert!(element.drops_unused_columns());
    }

    #[test]
    fn test_bare_element() {
        let element = DeclaredElement::new("Song");
        assert!(element.suppressed_warnings().is_empty());
        assert!(element.type_converters().is_empty());
        assert!(!element.drops_unused_columns());
    }
}
