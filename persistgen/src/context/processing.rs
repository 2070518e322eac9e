//! The scoped processing context.

use crate::adapters::{BuiltinAdapters, ConversionChain, DefaultAdapters, TypeAdapterResolver};
use crate::cache::Cache;
use crate::converters::{ConverterRegistry, TypeName};
use crate::diagnostics::{DiagnosticCollector, DiagnosticSink, Logger, Warning};
use crate::element::Element;
use crate::errors::ProcessorError;
use crate::options::ProcessorOptions;
use crate::rewrite::{select_rewriter, QueryRewriter};
use crate::verifier::SchemaVerifier;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

/// Cache bucket holding resolved conversion chains.
const TYPE_ADAPTER_BUCKET: &str = "type_adapters";

type ResolverCell = Arc<OnceLock<Arc<TypeAdapterResolver>>>;

/// Configuration scope for one node of the element tree.
///
/// A root context is created once per processing round and each analyzed
/// element forks a child from its enclosing context. Children inherit
/// suppressions, converters, the attached verifier and the round's cache.
///
/// The adapter resolver and the rewrite strategy are computed on first use.
/// A child that declares no converters shares its parent's resolver cell, so
/// the resolver is built at most once for every distinct converter set.
pub struct ProcessingContext {
    id: Uuid,
    depth: usize,
    logger: Logger,
    options: Arc<ProcessorOptions>,
    defaults: Arc<dyn DefaultAdapters>,
    converters: ConverterRegistry,
    cache: Cache,
    resolver: ResolverCell,
    verifier: Option<Arc<dyn SchemaVerifier>>,
    drop_unused_columns: bool,
    rewriter: OnceLock<QueryRewriter>,
}

impl ProcessingContext {
    /// Creates the root context of a processing round.
    #[must_use]
    pub fn new(options: ProcessorOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        let drop_unused_columns = options.drop_unused_columns;
        let context = Self {
            id: Uuid::new_v4(),
            depth: 0,
            logger: Logger::new(sink),
            options: Arc::new(options),
            defaults: Arc::new(BuiltinAdapters::standard()),
            converters: ConverterRegistry::new(),
            cache: Cache::new(),
            resolver: Arc::new(OnceLock::new()),
            verifier: None,
            drop_unused_columns,
            rewriter: OnceLock::new(),
        };
        tracing::debug!(context = %context.id, cache = %context.cache.store_id(), "Created root context");
        context
    }

    /// Replaces the built-in adapters of a root context.
    #[must_use]
    pub fn with_default_adapters(mut self, defaults: Arc<dyn DefaultAdapters>) -> Self {
        self.defaults = defaults;
        self.resolver = Arc::new(OnceLock::new());
        self
    }

    /// Forks a child context for `element`.
    #[must_use]
    pub fn fork(&self, element: Arc<dyn Element>) -> Self {
        self.fork_with_suppressions(element, &BTreeSet::new())
    }

    /// Forks a child context for `element`, additionally suppressing `forced`.
    ///
    /// Suppressions and the drop-unused-columns flag only grow down the tree.
    /// Converters declared by `element` take priority over inherited ones; when
    /// it declares none the child shares this context's resolver.
    #[must_use]
    pub fn fork_with_suppressions(
        &self,
        element: Arc<dyn Element>,
        forced: &BTreeSet<Warning>,
    ) -> Self {
        let mut declared: BTreeSet<Warning> = element
            .suppressed_warnings()
            .iter()
            .filter_map(|key| Warning::from_key(key))
            .collect();
        declared.extend(forced.iter().copied());
        let logger = self.logger.scoped(Arc::clone(&element), &declared);

        let local = element.type_converters();
        let (converters, resolver, new_classes) = if local.is_empty() {
            (self.converters.clone(), Arc::clone(&self.resolver), BTreeSet::new())
        } else {
            let classes: BTreeSet<String> = local.iter().map(|c| c.class_name.clone()).collect();
            (
                self.converters.layered(local),
                Arc::new(OnceLock::new()),
                classes,
            )
        };

        let marker = element.drops_unused_columns();
        if marker && self.options.expand_projection {
            logger.warn(
                Warning::ExpandProjectionWithDropUnusedColumns,
                Some(element.as_ref()),
                "Both expand projection and drop unused columns are enabled; \
                 unused columns will be dropped instead of expanding the projection",
            );
        }

        let cache = self.cache.fork(new_classes, logger.suppressed().clone());
        let child = Self {
            id: Uuid::new_v4(),
            depth: self.depth + 1,
            logger,
            options: Arc::clone(&self.options),
            defaults: Arc::clone(&self.defaults),
            converters,
            cache,
            resolver,
            verifier: self.verifier.clone(),
            drop_unused_columns: self.drop_unused_columns || marker,
            rewriter: OnceLock::new(),
        };

        tracing::debug!(
            parent = %self.id,
            context = %child.id,
            element = element.name(),
            depth = child.depth,
            shares_resolver = Arc::ptr_eq(&self.resolver, &child.resolver),
            "Forked context"
        );
        child
    }

    /// Runs `handler` against a sub-context whose diagnostics are captured.
    ///
    /// The sub-context shares this context's cache, converters, verifier and
    /// already-built resolver. Nothing it reports reaches this context's sink;
    /// a verifier it attaches stays in the sub-context.
    pub fn collect_logs<T, F>(&self, handler: F) -> (T, DiagnosticCollector)
    where
        F: FnOnce(&mut ProcessingContext) -> T,
    {
        // The resolver is handed down built so the handler never rebuilds it.
        self.type_adapter_resolver();

        let collector = Arc::new(DiagnosticCollector::new());
        let mut sub = Self {
            id: Uuid::new_v4(),
            depth: self.depth,
            logger: self.logger.redirected(collector.clone()),
            options: Arc::clone(&self.options),
            defaults: Arc::clone(&self.defaults),
            converters: self.converters.clone(),
            cache: self.cache.clone(),
            resolver: Arc::clone(&self.resolver),
            verifier: self.verifier.clone(),
            drop_unused_columns: self.drop_unused_columns,
            rewriter: OnceLock::new(),
        };
        tracing::trace!(parent = %self.id, context = %sub.id, "Collecting logs in sub-context");

        let result = handler(&mut sub);
        (result, collector.take())
    }

    /// Returns the adapter resolver, building it on first use.
    pub fn type_adapter_resolver(&self) -> Arc<TypeAdapterResolver> {
        Arc::clone(self.resolver.get_or_init(|| {
            tracing::debug!(context = %self.id, converters = self.converters.len(), "Building type adapter resolver");
            Arc::new(TypeAdapterResolver::new(
                Arc::clone(&self.defaults),
                &self.converters,
            ))
        }))
    }

    /// Resolves the conversion chain for `ty`.
    ///
    /// An unresolvable type is reported as an error against the current
    /// element before the error is returned.
    pub fn resolve_type(&self, ty: &TypeName) -> Result<ConversionChain, ProcessorError> {
        let resolved: Option<ConversionChain> =
            self.cache
                .get_or_compute(TYPE_ADAPTER_BUCKET, ty.as_str(), || {
                    self.type_adapter_resolver().resolve(ty)
                });

        resolved.ok_or_else(|| {
            let element = self.element_name();
            self.logger.error(
                None,
                format!("Cannot figure out how to read or write type '{ty}'"),
            );
            ProcessorError::unresolvable_type(ty.as_str(), element)
        })
    }

    /// Attaches the schema verifier of a database declaration.
    ///
    /// Fails if this context already has one. Contexts forked afterwards see
    /// the verifier, contexts forked earlier do not. The rewrite strategy is
    /// recomputed on next use.
    pub fn attach_database_verifier(
        &mut self,
        verifier: Arc<dyn SchemaVerifier>,
    ) -> Result<(), ProcessorError> {
        if self.verifier.is_some() {
            return Err(ProcessorError::verifier_already_attached(self.id));
        }
        self.verifier = Some(verifier);
        self.rewriter.take();
        tracing::debug!(context = %self.id, "Attached database verifier");
        Ok(())
    }

    /// Returns the attached verifier, if any.
    #[must_use]
    pub fn database_verifier(&self) -> Option<&Arc<dyn SchemaVerifier>> {
        self.verifier.as_ref()
    }

    /// Returns the query rewrite strategy, choosing it on first use.
    pub fn query_rewriter(&self) -> &QueryRewriter {
        self.rewriter.get_or_init(|| {
            select_rewriter(
                self.verifier.as_ref(),
                self.drop_unused_columns,
                self.options.expand_projection,
            )
        })
    }

    /// Forks for `element` and runs `step` against the child.
    ///
    /// Element-fatal errors skip the element and yield `Ok(None)`; any other
    /// error is returned.
    pub fn process_element<T, F>(
        &self,
        element: Arc<dyn Element>,
        step: F,
    ) -> Result<Option<T>, ProcessorError>
    where
        F: FnOnce(&mut ProcessingContext) -> Result<T, ProcessorError>,
    {
        let mut child = self.fork(element);
        match step(&mut child) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_element_fatal() => {
                tracing::debug!(
                    context = %child.id,
                    element = %child.element_name(),
                    code = err.code(),
                    "Skipping element: {err}"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the context id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the number of forks between this context and the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the element this context was forked for.
    #[must_use]
    pub fn element(&self) -> Option<&Arc<dyn Element>> {
        self.logger.element()
    }

    /// Returns the logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Returns the processor options.
    #[must_use]
    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Returns the effective suppression set.
    #[must_use]
    pub fn suppressed_warnings(&self) -> &BTreeSet<Warning> {
        self.logger.suppressed()
    }

    /// Returns whether queries drop unused result columns.
    #[must_use]
    pub fn drops_unused_columns(&self) -> bool {
        self.drop_unused_columns
    }

    /// Returns the converters in priority order.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Returns the round's cache, scoped to this context.
    #[must_use]
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Returns true if both contexts share one resolver cell.
    #[must_use]
    pub fn shares_resolver_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resolver, &other.resolver)
    }

    fn element_name(&self) -> String {
        self.element()
            .map_or_else(|| "<root>".to_string(), |e| e.name().to_string())
    }
}

impl fmt::Debug for ProcessingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingContext")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("logger", &self.logger)
            .field("converters", &self.converters.len())
            .field("cache", &self.cache)
            .field("verifier", &self.verifier.is_some())
            .field("drop_unused_columns", &self.drop_unused_columns)
            .finish_non_exhaustive()
    }
}
