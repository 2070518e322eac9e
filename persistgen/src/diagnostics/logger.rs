//! Per-context diagnostic logger.

use super::{Diagnostic, DiagnosticSink, Severity, Warning};
use crate::element::Element;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Attributes diagnostics to elements and drops suppressed warnings.
///
/// Cloning a logger is cheap; forks derive new loggers with a wider
/// suppression set and a more specific current element.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn DiagnosticSink>,
    suppressed: Arc<BTreeSet<Warning>>,
    element: Option<Arc<dyn Element>>,
}

impl Logger {
    /// Creates a logger writing to `sink` with nothing suppressed.
    #[must_use]
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            suppressed: Arc::new(BTreeSet::new()),
            element: None,
        }
    }

    /// Returns a logger for a nested element.
    ///
    /// The suppression set only grows: the result suppresses everything this
    /// logger suppresses plus `extra`.
    #[must_use]
    pub fn scoped(&self, element: Arc<dyn Element>, extra: &BTreeSet<Warning>) -> Self {
        let suppressed = if extra.is_subset(&self.suppressed) {
            Arc::clone(&self.suppressed)
        } else {
            Arc::new(self.suppressed.union(extra).copied().collect())
        };

        Self {
            sink: Arc::clone(&self.sink),
            suppressed,
            element: Some(element),
        }
    }

    /// Returns a logger with the same scope writing to another sink.
    #[must_use]
    pub fn redirected(&self, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            suppressed: Arc::clone(&self.suppressed),
            element: self.element.clone(),
        }
    }

    /// Returns the suppressed warning categories.
    #[must_use]
    pub fn suppressed(&self) -> &BTreeSet<Warning> {
        &self.suppressed
    }

    /// Returns true if `warning` would be dropped.
    #[must_use]
    pub fn is_suppressed(&self, warning: Warning) -> bool {
        self.suppressed.contains(&Warning::All) || self.suppressed.contains(&warning)
    }

    /// Returns the element diagnostics default to.
    #[must_use]
    pub fn element(&self) -> Option<&Arc<dyn Element>> {
        self.element.as_ref()
    }

    /// Returns the sink diagnostics are written to.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Reports an error.
    pub fn error(&self, element: Option<&dyn Element>, message: impl Into<String>) {
        self.emit(Severity::Error, None, element, message.into());
    }

    /// Reports a warning unless its category is suppressed.
    pub fn warn(&self, warning: Warning, element: Option<&dyn Element>, message: impl Into<String>) {
        if self.is_suppressed(warning) {
            tracing::trace!(category = warning.key(), "Dropping suppressed warning");
            return;
        }
        self.emit(Severity::Warning, Some(warning), element, message.into());
    }

    /// Reports a note.
    pub fn note(&self, element: Option<&dyn Element>, message: impl Into<String>) {
        self.emit(Severity::Note, None, element, message.into());
    }

    fn emit(
        &self,
        severity: Severity,
        warning: Option<Warning>,
        element: Option<&dyn Element>,
        message: String,
    ) {
        let mut diagnostic = Diagnostic::new(severity, message);
        let attributed = element.or_else(|| self.element.as_deref());
        if let Some(element) = attributed {
            diagnostic = diagnostic.with_element(element.name());
        }
        if let Some(warning) = warning {
            diagnostic = diagnostic.with_warning(warning);
        }
        self.sink.emit(diagnostic);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("suppressed", &self.suppressed)
            .field("element", &self.element.as_ref().map(|e| e.name().to_string()))
            .finish_non_exhaustive()
    }
}
