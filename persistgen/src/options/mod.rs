//! Processor options read once at the start of a round.
//!
//! Options arrive from the build tool as a flat string map. They are parsed
//! against a fixed option table into [`ProcessorOptions`] before the root
//! context is created, so no code downstream looks options up by key.

mod table;

pub use table::{OptionSpec, OPTIONS, OPTION_PREFIX};

use crate::errors::OptionsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Typed processor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorOptions {
    /// Whether the build runs incrementally. Carried through for hosts.
    pub incremental: bool,
    /// Whether `*` projections are expanded into explicit columns.
    pub expand_projection: bool,
    /// Whether every query drops result columns nobody reads.
    pub drop_unused_columns: bool,
    /// Where exported schemas are written. Passed through opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_location: Option<PathBuf>,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        let mut options = Self {
            incremental: false,
            expand_projection: false,
            drop_unused_columns: false,
            schema_location: None,
        };
        for spec in OPTIONS {
            if let Some(default) = spec.default {
                // Defaults in the table are known to parse.
                let _ = (spec.parse)(&mut options, spec.name, default);
            }
        }
        options
    }
}

impl ProcessorOptions {
    /// Creates options with every option at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from the raw key/value map handed over by the build tool.
    ///
    /// Keys outside the `persist.` namespace belong to other processors and
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` for unknown keys inside the namespace and for
    /// values that fail to parse.
    pub fn from_map(raw: &HashMap<String, String>) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        let mut keys: Vec<&String> = raw.keys().collect();
        keys.sort();

        for key in keys {
            let value = &raw[key];
            match OptionSpec::lookup(key) {
                Some(spec) => (spec.parse)(&mut options, spec.name, value.trim())?,
                None if key.starts_with(OPTION_PREFIX) => {
                    tracing::warn!(option = %key, "Rejecting unknown processor option");
                    return Err(OptionsError::unknown(key.as_str()));
                }
                None => {
                    tracing::debug!(option = %key, "Ignoring option owned by another processor");
                }
            }
        }

        Ok(options)
    }

    /// Sets the incremental flag.
    #[must_use]
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Sets the expand projection flag.
    #[must_use]
    pub fn with_expand_projection(mut self, enabled: bool) -> Self {
        self.expand_projection = enabled;
        self
    }

    /// Sets the default for dropping unused columns.
    #[must_use]
    pub fn with_drop_unused_columns(mut self, enabled: bool) -> Self {
        self.drop_unused_columns = enabled;
        self
    }

    /// Sets the schema output location.
    #[must_use]
    pub fn with_schema_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.schema_location = Some(location.into());
        self
    }

    /// Returns the names of every recognized option.
    #[must_use]
    pub fn supported() -> Vec<&'static str> {
        OPTIONS.iter().map(|spec| spec.name).collect()
    }
}
