//! # Persistgen
//!
//! The processing core of an object/SQL mapping code generator.
//!
//! Persistgen walks the annotated elements of a program with a tree of
//! scoped configuration contexts:
//!
//! - **Scoped contexts**: every analyzed element forks a child that inherits
//!   suppressions, converters and the attached schema verifier
//! - **Type resolution**: conversion chains from requested types to stored
//!   column types, resolved once per distinct converter set
//! - **Round cache**: one memoization store shared by every context of a round
//! - **Query rewriting**: a strategy chosen from options and verifier presence
//! - **Diagnostics**: element-attributed, suppressible and collectable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use persistgen::prelude::*;
//!
//! let sink = Arc::new(TracingDiagnosticSink::default());
//! let root = ProcessingContext::new(ProcessorOptions::from_map(&raw)?, sink);
//!
//! let dao = root.fork(Arc::new(DeclaredElement::new("SongDao")));
//! let chain = dao.resolve_type(&TypeName::new("Instant"))?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod adapters;
pub mod cache;
pub mod context;
pub mod converters;
pub mod diagnostics;
pub mod element;
pub mod errors;
pub mod observability;
pub mod options;
pub mod rewrite;
pub mod testing;
pub mod verifier;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::{
        BuiltinAdapters, ColumnAffinity, ConversionChain, DefaultAdapters, TypeAdapterResolver,
    };
    pub use crate::cache::{Cache, CacheStats};
    pub use crate::context::ProcessingContext;
    pub use crate::converters::{ConverterDescriptor, ConverterRegistry, TypeName};
    pub use crate::diagnostics::{
        Diagnostic, DiagnosticCollector, DiagnosticSink, NoOpDiagnosticSink, Severity,
        TracingDiagnosticSink, Warning,
    };
    pub use crate::element::{DeclaredElement, Element};
    pub use crate::errors::{OptionsError, ProcessorError};
    pub use crate::options::ProcessorOptions;
    pub use crate::rewrite::{QueryRewriter, RewriteKind, SelectQuery};
    pub use crate::verifier::{SchemaVerifier, StaticSchemaVerifier, TableSchema};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_prelude_round() {
        let root = ProcessingContext::new(ProcessorOptions::default(), Arc::new(NoOpDiagnosticSink));
        let dao = root.fork(Arc::new(DeclaredElement::new("SongDao")));

        let chain = dao.resolve_type(&TypeName::new("Instant")).unwrap();
        assert_eq!(chain.affinity(), ColumnAffinity::Integer);
        assert_eq!(dao.query_rewriter().kind(), RewriteKind::NoOp);
    }
}
