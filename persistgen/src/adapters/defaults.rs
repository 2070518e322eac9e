//! Built-in column types and conversions.

use super::ColumnAffinity;
use crate::converters::{ConverterDescriptor, TypeName};
use std::collections::HashMap;
use std::fmt;

/// The conversions available in every context, independent of elements.
pub trait DefaultAdapters: fmt::Debug + Send + Sync {
    /// Returns the column affinity for types stored without conversion.
    fn column_affinity(&self, ty: &TypeName) -> Option<ColumnAffinity>;

    /// Returns the conversions shipped with the processor.
    fn converters(&self) -> Vec<ConverterDescriptor>;
}

/// A table-driven [`DefaultAdapters`] implementation.
#[derive(Debug, Clone, Default)]
pub struct BuiltinAdapters {
    columns: HashMap<TypeName, ColumnAffinity>,
    converters: Vec<ConverterDescriptor>,
}

impl BuiltinAdapters {
    /// Creates an adapter table with nothing in it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the standard table of primitive columns and conversions.
    #[must_use]
    pub fn standard() -> Self {
        let mut adapters = Self::empty();
        for ty in ["Int", "Long", "Short", "Byte", "Boolean", "Char"] {
            adapters = adapters.with_column(ty, ColumnAffinity::Integer);
        }
        for ty in ["Float", "Double"] {
            adapters = adapters.with_column(ty, ColumnAffinity::Real);
        }
        adapters
            .with_column("String", ColumnAffinity::Text)
            .with_column("ByteArray", ColumnAffinity::Blob)
            .with_converter(ConverterDescriptor::builtin("UUID", "ByteArray"))
            .with_converter(ConverterDescriptor::builtin("Instant", "Long"))
            .with_converter(ConverterDescriptor::builtin("Enum", "String"))
    }

    /// Adds a directly stored type.
    #[must_use]
    pub fn with_column(mut self, ty: impl Into<TypeName>, affinity: ColumnAffinity) -> Self {
        self.columns.insert(ty.into(), affinity);
        self
    }

    /// Adds a built-in conversion.
    #[must_use]
    pub fn with_converter(mut self, converter: ConverterDescriptor) -> Self {
        self.converters.push(converter);
        self
    }
}

impl DefaultAdapters for BuiltinAdapters {
    fn column_affinity(&self, ty: &TypeName) -> Option<ColumnAffinity> {
        self.columns.get(ty).copied()
    }

    fn converters(&self) -> Vec<ConverterDescriptor> {
        self.converters.clone()
    }
}
