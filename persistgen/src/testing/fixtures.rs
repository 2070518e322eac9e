//! Test fixtures for processing rounds.

use std::sync::Arc;

use crate::adapters::DefaultAdapters;
use crate::context::ProcessingContext;
use crate::converters::ConverterDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, Severity, Warning};
use crate::element::{DeclaredElement, Element};
use crate::options::ProcessorOptions;
use crate::verifier::{SchemaVerifier, StaticSchemaVerifier, TableSchema};

/// Builder for elements used in tests.
#[derive(Debug, Clone, Default)]
pub struct TestElement {
    inner: DeclaredElement,
}

impl TestElement {
    /// Creates an element with nothing declared.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: DeclaredElement::new(name),
        }
    }

    /// Declares a suppressed warning.
    #[must_use]
    pub fn suppressing(mut self, warning: Warning) -> Self {
        self.inner = self.inner.suppressing(warning.key());
        self
    }

    /// Declares a raw suppression key, known or not.
    #[must_use]
    pub fn suppressing_key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.suppressing(key);
        self
    }

    /// Declares a converter.
    #[must_use]
    pub fn converter(mut self, class_name: &str, from: &str, to: &str) -> Self {
        self.inner = self.inner.with_converter(converter(class_name, from, to));
        self
    }

    /// Carries the drop-unused-columns marker.
    #[must_use]
    pub fn dropping_unused_columns(mut self) -> Self {
        self.inner = self.inner.dropping_unused_columns();
        self
    }

    /// Finishes the element.
    #[must_use]
    pub fn build(self) -> Arc<dyn Element> {
        Arc::new(self.inner)
    }
}

/// Creates a converter descriptor.
#[must_use]
pub fn converter(class_name: &str, from: &str, to: &str) -> ConverterDescriptor {
    ConverterDescriptor::new(class_name, from, to)
}

/// A verifier knowing a small music schema.
#[must_use]
pub fn song_schema() -> Arc<dyn SchemaVerifier> {
    Arc::new(StaticSchemaVerifier::new([
        TableSchema::entity("Song", ["id", "title", "albumId", "lyrics"]),
        TableSchema::entity("Album", ["id", "name"]),
        TableSchema::view("SongTitle", ["id", "title"]),
    ]))
}

/// A processing round whose root reports into a collector.
pub struct TestRound {
    root: ProcessingContext,
    collector: Arc<DiagnosticCollector>,
}

impl Default for TestRound {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRound {
    /// Creates a round with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ProcessorOptions::default())
    }

    /// Creates a round with the given options.
    #[must_use]
    pub fn with_options(options: ProcessorOptions) -> Self {
        let collector = Arc::new(DiagnosticCollector::new());
        let root = ProcessingContext::new(options, collector.clone());
        Self { root, collector }
    }

    /// Replaces the root's built-in adapters.
    #[must_use]
    pub fn with_defaults(mut self, defaults: impl DefaultAdapters + 'static) -> Self {
        self.root = self.root.with_default_adapters(Arc::new(defaults));
        self
    }

    /// Returns the root context.
    #[must_use]
    pub fn root(&self) -> &ProcessingContext {
        &self.root
    }

    /// Returns the root context mutably.
    pub fn root_mut(&mut self) -> &mut ProcessingContext {
        &mut self.root
    }

    /// Returns the diagnostics that reached the round's sink.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collector.diagnostics()
    }

    /// Returns the warnings of one category that reached the sink.
    #[must_use]
    pub fn warnings(&self, warning: Warning) -> Vec<Diagnostic> {
        self.collector
            .of_severity(Severity::Warning)
            .into_iter()
            .filter(|d| d.warning == Some(warning))
            .collect()
    }

    /// Returns the round's collector.
    #[must_use]
    pub fn collector(&self) -> &DiagnosticCollector {
        &self.collector
    }
}
