//! Round-scoped memoization shared by every context of a fork tree.
//!
//! One store exists per processing round. Each context holds a scope into it;
//! a scope is identified by a fingerprint of its parent scope, the converter
//! classes it introduced and its effective suppression set.

mod key;
mod store;

pub use key::{CacheKey, ScopeFingerprint};
pub use store::{Cache, CacheStats};
