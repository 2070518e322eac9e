//! Diagnostics reported to the user of the code generator.
//!
//! This module provides:
//! - The [`Diagnostic`] record and its [`Severity`]
//! - Suppressible [`Warning`] categories
//! - Sinks that receive diagnostics, including an isolated collector
//! - The [`Logger`] each context uses to attribute and filter diagnostics

mod logger;
mod sink;
mod warning;

pub use logger::Logger;
pub use sink::{DiagnosticCollector, DiagnosticSink, NoOpDiagnosticSink, TracingDiagnosticSink};
pub use warning::Warning;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational output.
    Note,
    /// Something suspicious that does not stop generation.
    Warning,
    /// Generation for the element cannot proceed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A structured diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity.
    pub severity: Severity,
    /// The message shown to the user.
    pub message: String,
    /// Name of the element the diagnostic is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// The warning category, for warnings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Warning>,
    /// When the diagnostic was emitted.
    pub emitted_at: DateTime<Utc>,
}

impl Diagnostic {
    /// Creates a diagnostic with no element attribution.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            element: None,
            warning: None,
            emitted_at: Utc::now(),
        }
    }

    /// Sets the element the diagnostic is attributed to.
    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Sets the warning category.
    #[must_use]
    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warning = Some(warning);
        self
    }

    /// Returns true for errors.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(warning) = self.warning {
            write!(f, "[{}]", warning.key())?;
        }
        if let Some(ref element) = self.element {
            write!(f, " {element}")?;
        }
        write!(f, ": {}", self.message)
    }
}
