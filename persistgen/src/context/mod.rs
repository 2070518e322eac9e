//! Processing contexts.
//!
//! This module provides:
//! - The [`ProcessingContext`] forked once per analyzed element
//! - Isolated log collection for speculative work
//! - Lazily built type adapter resolvers and rewrite strategies

#[cfg(test)]
mod context_tests;
mod processing;

pub use processing::ProcessingContext;
