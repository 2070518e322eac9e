//! Conversion chains.

use crate::converters::{ConverterDescriptor, TypeName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The storage class a column ends up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnAffinity {
    /// Signed integer storage.
    Integer,
    /// Floating point storage.
    Real,
    /// Text storage.
    Text,
    /// Raw bytes.
    Blob,
}

impl fmt::Display for ColumnAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

/// One hop of a conversion chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStep {
    /// Converter class performing the hop.
    pub converter: String,
    /// Input type.
    pub from: TypeName,
    /// Output type.
    pub to: TypeName,
}

impl From<&ConverterDescriptor> for ConversionStep {
    fn from(desc: &ConverterDescriptor) -> Self {
        Self {
            converter: desc.class_name.clone(),
            from: desc.from.clone(),
            to: desc.to.clone(),
        }
    }
}

/// How a requested type is read from and written to a column.
///
/// Writing applies the steps in order and stores the last type with the
/// chain's affinity; reading reverses the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionChain {
    requested: TypeName,
    steps: Vec<ConversionStep>,
    affinity: ColumnAffinity,
}

impl ConversionChain {
    /// Creates a chain.
    #[must_use]
    pub fn new(requested: TypeName, steps: Vec<ConversionStep>, affinity: ColumnAffinity) -> Self {
        Self {
            requested,
            steps,
            affinity,
        }
    }

    /// Returns the requested type.
    #[must_use]
    pub fn requested(&self) -> &TypeName {
        &self.requested
    }

    /// Returns the conversion hops, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[ConversionStep] {
        &self.steps
    }

    /// Returns the type actually bound to the column.
    #[must_use]
    pub fn stored_type(&self) -> &TypeName {
        self.steps.last().map_or(&self.requested, |step| &step.to)
    }

    /// Returns the column affinity.
    #[must_use]
    pub fn affinity(&self) -> ColumnAffinity {
        self.affinity
    }

    /// Returns true when the type maps to a column without conversion.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ConversionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.requested)?;
        for step in &self.steps {
            write!(f, " -[{}]-> {}", step.converter, step.to)?;
        }
        write!(f, " : {}", self.affinity)
    }
}
