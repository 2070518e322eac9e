//! Diagnostic sink trait and implementations.

use super::{Diagnostic, Severity};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn, Level};

/// Trait for sinks that receive diagnostics.
///
/// A real host forwards diagnostics to its compiler's message channel.
pub trait DiagnosticSink: Send + Sync {
    /// Receives one diagnostic. Must not fail.
    fn emit(&self, diagnostic: Diagnostic);
}

/// A sink that discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDiagnosticSink;

impl DiagnosticSink for NoOpDiagnosticSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// A sink that reports diagnostics through the tracing framework.
#[derive(Debug, Clone)]
pub struct TracingDiagnosticSink {
    /// The level notes are logged at.
    note_level: Level,
}

impl Default for TracingDiagnosticSink {
    fn default() -> Self {
        Self {
            note_level: Level::INFO,
        }
    }
}

impl TracingDiagnosticSink {
    /// Creates a sink logging notes at the given level.
    #[must_use]
    pub fn new(note_level: Level) -> Self {
        Self { note_level }
    }

    /// Creates a sink that logs notes at debug level.
    #[must_use]
    pub fn quiet_notes() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl DiagnosticSink for TracingDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let element = diagnostic.element.as_deref().unwrap_or("<none>");
        let category = diagnostic.warning.map(|w| w.key());

        match diagnostic.severity {
            Severity::Error => {
                error!(element, "{}", diagnostic.message);
            }
            Severity::Warning => {
                warn!(element, ?category, "{}", diagnostic.message);
            }
            Severity::Note if self.note_level == Level::DEBUG => {
                debug!(element, "{}", diagnostic.message);
            }
            Severity::Note => {
                info!(element, "{}", diagnostic.message);
            }
        }
    }
}

/// A sink that buffers diagnostics for later inspection or replay.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    /// Creates a new empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.read().clone()
    }

    /// Returns the diagnostics of one severity.
    #[must_use]
    pub fn of_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.diagnostics
            .read()
            .iter()
            .filter(|d| d.severity == severity)
            .cloned()
            .collect()
    }

    /// Returns true if any error was collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.read().iter().any(Diagnostic::is_error)
    }

    /// Forwards every collected diagnostic to another sink, in order.
    pub fn replay_into(&self, sink: &dyn DiagnosticSink) {
        for diagnostic in self.diagnostics.read().iter() {
            sink.emit(diagnostic.clone());
        }
    }

    /// Moves the collected diagnostics into a new collector, leaving this one empty.
    #[must_use]
    pub fn take(&self) -> Self {
        let drained = std::mem::take(&mut *self.diagnostics.write());
        Self {
            diagnostics: RwLock::new(drained),
        }
    }

    /// Returns the number of collected diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.read().is_empty()
    }

    /// Clears all collected diagnostics.
    pub fn clear(&self) {
        self.diagnostics.write().clear();
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.write().push(diagnostic);
    }
}
