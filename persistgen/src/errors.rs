//! Error types for the persistgen processing core.
//!
//! Errors fall in two classes: element-fatal errors abort the analysis of the
//! element that raised them while sibling elements keep going, and round-fatal
//! errors abort the whole processing round.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for processing operations.
#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    /// A schema verifier was attached to a context that already has one.
    #[error("Context {context} already has a database verifier attached")]
    VerifierAlreadyAttached {
        /// The id of the context that rejected the attachment.
        context: Uuid,
    },

    /// No conversion chain exists for the requested type.
    #[error("Cannot figure out how to read or write type '{type_name}' in {element}")]
    UnresolvableType {
        /// The requested type.
        type_name: String,
        /// The element that requested it.
        element: String,
    },

    /// Processor options could not be parsed.
    #[error("{0}")]
    Options(#[from] OptionsError),
}

impl ProcessorError {
    /// Creates a verifier double attachment error.
    #[must_use]
    pub fn verifier_already_attached(context: Uuid) -> Self {
        Self::VerifierAlreadyAttached { context }
    }

    /// Creates an unresolvable type error.
    #[must_use]
    pub fn unresolvable_type(type_name: impl Into<String>, element: impl Into<String>) -> Self {
        Self::UnresolvableType {
            type_name: type_name.into(),
            element: element.into(),
        }
    }

    /// Returns true when the error only invalidates the current element.
    #[must_use]
    pub fn is_element_fatal(&self) -> bool {
        matches!(self, Self::UnresolvableType { .. })
    }

    /// Returns a stable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::VerifierAlreadyAttached { .. } => "PERSIST-001-VERIFIER",
            Self::UnresolvableType { .. } => "PERSIST-002-TYPE",
            Self::Options(OptionsError::UnknownOption { .. }) => "PERSIST-003-OPTION",
            Self::Options(OptionsError::InvalidValue { .. }) => "PERSIST-004-VALUE",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::VerifierAlreadyAttached { context } => {
                map.insert("type".to_string(), serde_json::json!("VerifierAlreadyAttached"));
                map.insert("context".to_string(), serde_json::json!(context.to_string()));
            }
            Self::UnresolvableType { type_name, element } => {
                map.insert("type".to_string(), serde_json::json!("UnresolvableType"));
                map.insert("type_name".to_string(), serde_json::json!(type_name));
                map.insert("element".to_string(), serde_json::json!(element));
            }
            Self::Options(err) => {
                map.insert("type".to_string(), serde_json::json!("InvalidOptions"));
                map.insert("option".to_string(), serde_json::json!(err.option()));
            }
        }

        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors raised while reading processor options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// A key in the processor namespace is not a recognized option.
    #[error("Unknown processor option '{name}'")]
    UnknownOption {
        /// The unrecognized key.
        name: String,
    },

    /// A recognized option carried a value that does not parse.
    #[error("Invalid value '{value}' for option '{name}': expected {expected}")]
    InvalidValue {
        /// The option key.
        name: String,
        /// The raw value.
        value: String,
        /// What the parser expected.
        expected: &'static str,
    },
}

impl OptionsError {
    /// Creates an unknown option error.
    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownOption { name: name.into() }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Returns the option key involved.
    #[must_use]
    pub fn option(&self) -> &str {
        match self {
            Self::UnknownOption { name } | Self::InvalidValue { name, .. } => name,
        }
    }
}
