//! Type names and converter descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class name recorded on conversions that ship with the processor.
pub const BUILTIN_CONVERTER_CLASS: &str = "<builtin>";

/// A fully qualified host-language type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One conversion method of a converter class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConverterDescriptor {
    /// The converter class declaring the method.
    pub class_name: String,
    /// The type the method reads.
    pub from: TypeName,
    /// The type the method produces.
    pub to: TypeName,
}

impl ConverterDescriptor {
    /// Creates a converter descriptor.
    #[must_use]
    pub fn new(
        class_name: impl Into<String>,
        from: impl Into<TypeName>,
        to: impl Into<TypeName>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a descriptor for a conversion shipped with the processor.
    #[must_use]
    pub fn builtin(from: impl Into<TypeName>, to: impl Into<TypeName>) -> Self {
        Self::new(BUILTIN_CONVERTER_CLASS, from, to)
    }

    /// Returns true for processor-provided conversions.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.class_name == BUILTIN_CONVERTER_CLASS
    }

    /// Returns true when both descriptors convert the same type pair.
    #[must_use]
    pub fn same_pair(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl fmt::Display for ConverterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} -> {})", self.class_name, self.from, self.to)
    }
}
