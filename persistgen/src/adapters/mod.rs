//! Type adapters: how a host type reaches a column representation.
//!
//! This module provides:
//! - Built-in column types and conversions ([`DefaultAdapters`])
//! - Conversion chains produced by resolution
//! - The per-context [`TypeAdapterResolver`]

mod chain;
mod defaults;
mod resolver;

pub use chain::{ColumnAffinity, ConversionChain, ConversionStep};
pub use defaults::{BuiltinAdapters, DefaultAdapters};
pub use resolver::{TypeAdapterResolver, MAX_CHAIN_LENGTH};
