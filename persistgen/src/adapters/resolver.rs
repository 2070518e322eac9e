//! Per-context type adapter resolution.

use super::{ColumnAffinity, ConversionChain, ConversionStep, DefaultAdapters};
use crate::converters::{ConverterDescriptor, ConverterRegistry, TypeName};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Longest conversion chain the resolver will build.
pub const MAX_CHAIN_LENGTH: usize = 4;

type ConverterIndex = HashMap<TypeName, Vec<ConverterDescriptor>>;

/// Maps requested types to conversion chains.
///
/// Custom converters are tried first, in registry order, so converters
/// declared closer to the element shadow outer ones for the same type pair.
/// A directly stored type comes next and built-in conversions come last.
#[derive(Debug)]
pub struct TypeAdapterResolver {
    defaults: Arc<dyn DefaultAdapters>,
    custom: ConverterIndex,
    builtin: ConverterIndex,
}

impl TypeAdapterResolver {
    /// Builds a resolver over `converters` layered on top of `defaults`.
    #[must_use]
    pub fn new(defaults: Arc<dyn DefaultAdapters>, converters: &ConverterRegistry) -> Self {
        let mut custom = ConverterIndex::new();
        for desc in converters.iter() {
            index_unshadowed(&mut custom, desc);
        }

        let mut builtin = ConverterIndex::new();
        for desc in defaults.converters() {
            let shadowed = custom
                .get(&desc.from)
                .is_some_and(|slot| slot.iter().any(|c| c.same_pair(&desc)));
            if !shadowed {
                index_unshadowed(&mut builtin, &desc);
            }
        }

        tracing::debug!(
            custom = custom.values().map(Vec::len).sum::<usize>(),
            builtin = builtin.values().map(Vec::len).sum::<usize>(),
            "Built type adapter resolver"
        );

        Self {
            defaults,
            custom,
            builtin,
        }
    }

    /// Resolves the conversion chain for `ty`.
    ///
    /// Returns `None` when no chain reaches a stored column type.
    #[must_use]
    pub fn resolve(&self, ty: &TypeName) -> Option<ConversionChain> {
        let mut path = Vec::new();
        let mut visiting = HashSet::from([ty.clone()]);
        let affinity = self.search(ty, &mut path, &mut visiting)?;
        Some(ConversionChain::new(ty.clone(), path, affinity))
    }

    /// Returns the custom converters reading `ty`, highest priority first.
    #[must_use]
    pub fn custom_converters_from(&self, ty: &TypeName) -> &[ConverterDescriptor] {
        self.custom.get(ty).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the number of effective custom converters.
    #[must_use]
    pub fn custom_converter_count(&self) -> usize {
        self.custom.values().map(Vec::len).sum()
    }

    fn search(
        &self,
        ty: &TypeName,
        path: &mut Vec<ConversionStep>,
        visiting: &mut HashSet<TypeName>,
    ) -> Option<ColumnAffinity> {
        if let Some(affinity) = self.follow(self.custom.get(ty), path, visiting) {
            return Some(affinity);
        }
        if let Some(affinity) = self.defaults.column_affinity(ty) {
            return Some(affinity);
        }
        self.follow(self.builtin.get(ty), path, visiting)
    }

    fn follow(
        &self,
        candidates: Option<&Vec<ConverterDescriptor>>,
        path: &mut Vec<ConversionStep>,
        visiting: &mut HashSet<TypeName>,
    ) -> Option<ColumnAffinity> {
        if path.len() >= MAX_CHAIN_LENGTH {
            return None;
        }

        for desc in candidates.into_iter().flatten() {
            if !visiting.insert(desc.to.clone()) {
                continue;
            }
            path.push(ConversionStep::from(desc));
            if let Some(affinity) = self.search(&desc.to, path, visiting) {
                return Some(affinity);
            }
            path.pop();
            visiting.remove(&desc.to);
        }

        None
    }
}

fn index_unshadowed(index: &mut ConverterIndex, desc: &ConverterDescriptor) {
    let slot = index.entry(desc.from.clone()).or_default();
    if !slot.iter().any(|existing| existing.same_pair(desc)) {
        slot.push(desc.clone());
    }
}
