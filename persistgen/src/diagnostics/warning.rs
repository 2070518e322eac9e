//! Suppressible warning categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A warning category an element can suppress by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Warning {
    /// Suppresses every warning category.
    #[serde(rename = "PERSIST_ALL")]
    All,
    /// Query result columns do not match the returned type.
    #[serde(rename = "PERSIST_CURSOR_MISMATCH")]
    CursorMismatch,
    /// Query shape does not match the declared return type.
    #[serde(rename = "PERSIST_QUERY_MISMATCH")]
    QueryMismatch,
    /// Schema export is on but no schema location is configured.
    #[serde(rename = "PERSIST_MISSING_SCHEMA_LOCATION")]
    MissingSchemaLocation,
    /// A result column name resolves to several tables.
    #[serde(rename = "PERSIST_AMBIGUOUS_COLUMN_IN_RESULT")]
    AmbiguousColumnInResult,
    /// Drop-unused-columns requested while projection expansion is enabled.
    #[serde(rename = "PERSIST_EXPAND_PROJECTION_WITH_DROP_UNUSED_COLUMNS")]
    ExpandProjectionWithDropUnusedColumns,
}

impl Warning {
    /// Every category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::CursorMismatch,
        Self::QueryMismatch,
        Self::MissingSchemaLocation,
        Self::AmbiguousColumnInResult,
        Self::ExpandProjectionWithDropUnusedColumns,
    ];

    /// Returns the public key used in suppression annotations.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::All => "PERSIST_ALL",
            Self::CursorMismatch => "PERSIST_CURSOR_MISMATCH",
            Self::QueryMismatch => "PERSIST_QUERY_MISMATCH",
            Self::MissingSchemaLocation => "PERSIST_MISSING_SCHEMA_LOCATION",
            Self::AmbiguousColumnInResult => "PERSIST_AMBIGUOUS_COLUMN_IN_RESULT",
            Self::ExpandProjectionWithDropUnusedColumns => {
                "PERSIST_EXPAND_PROJECTION_WITH_DROP_UNUSED_COLUMNS"
            }
        }
    }

    /// Parses a public key. Unknown keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|warning| warning.key() == key)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
