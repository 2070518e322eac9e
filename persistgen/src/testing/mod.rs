//! Testing utilities for processing rounds.
//!
//! This module provides:
//! - A [`TestRound`] harness wiring a root context to a collector
//! - Element and schema fixtures
//! - Assertions over resolution results and collected diagnostics

mod assertions;
mod fixtures;

pub use assertions::{assert_no_errors, assert_resolves_to, assert_warning_count};
pub use fixtures::{converter, song_schema, TestElement, TestRound};
