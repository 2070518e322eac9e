//! Rewrite strategy selection.

use super::QueryRewriter;
use crate::verifier::SchemaVerifier;
use std::sync::Arc;

/// Chooses the rewrite strategy for a context.
///
/// Without a verifier nothing is rewritten. With one, dropping unused columns
/// takes precedence over expanding projections.
#[must_use]
pub fn select_rewriter(
    verifier: Option<&Arc<dyn SchemaVerifier>>,
    drop_unused_columns: bool,
    expand_projection: bool,
) -> QueryRewriter {
    let Some(verifier) = verifier else {
        return QueryRewriter::NoOp;
    };

    if drop_unused_columns {
        QueryRewriter::RemoveUnusedColumns {
            schema: Arc::clone(verifier),
        }
    } else if expand_projection {
        QueryRewriter::ExpandProjection {
            schema: Arc::clone(verifier),
        }
    } else {
        QueryRewriter::NoOp
    }
}
