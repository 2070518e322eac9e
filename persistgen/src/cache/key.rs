//! Composite cache scope keys.

use crate::diagnostics::Warning;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

/// Stable identity of a cache scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeFingerprint(String);

impl ScopeFingerprint {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The configuration a cache scope was created under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Fingerprint of the enclosing scope, `None` for the root.
    pub parent: Option<ScopeFingerprint>,
    /// Converter classes the scope introduced.
    pub converter_classes: BTreeSet<String>,
    /// Effective suppression set of the scope.
    pub suppressed: BTreeSet<Warning>,
}

impl CacheKey {
    /// Key of the root scope.
    #[must_use]
    pub fn root() -> Self {
        Self {
            parent: None,
            converter_classes: BTreeSet::new(),
            suppressed: BTreeSet::new(),
        }
    }

    /// Key of a scope nested in `parent`.
    #[must_use]
    pub fn child(
        parent: ScopeFingerprint,
        converter_classes: BTreeSet<String>,
        suppressed: BTreeSet<Warning>,
    ) -> Self {
        Self {
            parent: Some(parent),
            converter_classes,
            suppressed,
        }
    }

    /// Returns true if the scope introduced converters.
    #[must_use]
    pub fn introduces_converters(&self) -> bool {
        !self.converter_classes.is_empty()
    }

    /// Computes the scope fingerprint.
    ///
    /// Equal keys always produce equal fingerprints.
    #[must_use]
    pub fn fingerprint(&self) -> ScopeFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(
            self.parent
                .as_ref()
                .map_or("root", ScopeFingerprint::as_str)
                .as_bytes(),
        );
        hasher.update(b"\0converters");
        for class in &self.converter_classes {
            hasher.update(b"\0");
            hasher.update(class.as_bytes());
        }
        hasher.update(b"\0suppressed");
        for warning in &self.suppressed {
            hasher.update(b"\0");
            hasher.update(warning.key().as_bytes());
        }
        let result = hasher.finalize();
        ScopeFingerprint(hex::encode(&result[..16]))
    }
}
