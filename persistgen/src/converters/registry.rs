//! Ordered converter registry shared down the fork tree.

use super::ConverterDescriptor;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// An ordered, de-duplicated list of converter descriptors.
///
/// Earlier entries take priority: a child context prepends its own converters
/// to its parent's list. Cloning is cheap and an inherited registry shares
/// storage with its parent.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    descriptors: Arc<Vec<ConverterDescriptor>>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from descriptors in priority order.
    #[must_use]
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ConverterDescriptor>) -> Self {
        Self::new().layered(descriptors)
    }

    /// Returns a registry with `local` ahead of everything in `self`.
    ///
    /// When `local` is empty the returned registry shares storage with `self`.
    #[must_use]
    pub fn layered(&self, local: impl IntoIterator<Item = ConverterDescriptor>) -> Self {
        let local: Vec<ConverterDescriptor> = local.into_iter().collect();
        if local.is_empty() {
            return self.clone();
        }

        let mut seen = HashSet::new();
        let descriptors = local
            .into_iter()
            .chain(self.descriptors.iter().cloned())
            .filter(|desc| seen.insert(desc.clone()))
            .collect();

        Self {
            descriptors: Arc::new(descriptors),
        }
    }

    /// Returns the descriptors in priority order.
    #[must_use]
    pub fn descriptors(&self) -> &[ConverterDescriptor] {
        &self.descriptors
    }

    /// Returns an iterator over the descriptors in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &ConverterDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the distinct converter class names.
    #[must_use]
    pub fn classes(&self) -> BTreeSet<String> {
        self.descriptors
            .iter()
            .map(|desc| desc.class_name.clone())
            .collect()
    }

    /// Returns the highest-priority descriptor converting `from` into `to`.
    #[must_use]
    pub fn find(&self, from: &str, to: &str) -> Option<&ConverterDescriptor> {
        self.descriptors
            .iter()
            .find(|desc| desc.from.as_str() == from && desc.to.as_str() == to)
    }

    /// Returns true when both registries share the same storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptors, &other.descriptors)
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layered_puts_local_first() {
        let parent = ConverterRegistry::from_descriptors([ConverterDescriptor::new(
            "ParentConverters",
            "Foo",
            "String",
        )]);
        let child = parent.layered([ConverterDescriptor::new("ChildConverters", "Foo", "Long")]);

        let classes: Vec<&str> = child.iter().map(|d| d.class_name.as_str()).collect();
        assert_eq!(classes, vec!["ChildConverters", "ParentConverters"]);
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn test_layered_empty_shares_storage() {
        let parent = ConverterRegistry::from_descriptors([ConverterDescriptor::new(
            "Converters",
            "Foo",
            "Bar",
        )]);
        let child = parent.layered(Vec::new());

        assert!(child.shares_storage_with(&parent));
    }

    #[test]
    fn test_layered_drops_exact_duplicates() {
        let desc = ConverterDescriptor::new("Converters", "Foo", "Bar");
        let parent = ConverterRegistry::from_descriptors([desc.clone()]);
        let child = parent.layered([desc.clone(), desc]);

        assert_eq!(child.len(), 1);
        assert!(!child.shares_storage_with(&parent));
    }

    #[test]
    fn test_find_prefers_earlier_entries() {
        let parent = ConverterRegistry::from_descriptors([ConverterDescriptor::new(
            "Outer", "Foo", "Bar",
        )]);
        let child = parent.layered([ConverterDescriptor::new("Inner", "Foo", "Bar")]);

        assert_eq!(child.find("Foo", "Bar").unwrap().class_name, "Inner");
        assert!(child.find("Bar", "Foo").is_none());
    }

    #[test]
    fn test_classes() {
        let registry = ConverterRegistry::from_descriptors([
            ConverterDescriptor::new("DateConverters", "Date", "Long"),
            ConverterDescriptor::new("DateConverters", "Long", "Date"),
            ConverterDescriptor::new("UuidConverters", "UUID", "String"),
        ]);

        assert_eq!(registry.classes().len(), 2);
    }
}
