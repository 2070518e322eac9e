//! Query rewriting.
//!
//! This module provides:
//! - A structured [`SelectQuery`] the generator hands to rewriters
//! - The [`QueryRewriter`] strategies
//! - [`select_rewriter`], which picks a strategy for a context

mod query;
mod selector;
mod strategy;

pub use query::{Projection, SelectQuery};
pub use selector::select_rewriter;
pub use strategy::{QueryRewriter, RewriteKind, RewrittenQuery};
