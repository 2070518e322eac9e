//! Test assertions for resolution results and diagnostics.

use crate::context::ProcessingContext;
use crate::converters::TypeName;
use crate::diagnostics::{DiagnosticCollector, Severity, Warning};

/// Asserts that `ty` resolves in `ctx` to a chain storing `stored`.
pub fn assert_resolves_to(ctx: &ProcessingContext, ty: &str, stored: &str) {
    match ctx.resolve_type(&TypeName::new(ty)) {
        Ok(chain) => assert_eq!(
            chain.stored_type().as_str(),
            stored,
            "Expected {ty} to be stored as {stored}, got chain {chain}"
        ),
        Err(err) => panic!("Expected {ty} to resolve, got: {err}"),
    }
}

/// Asserts that no error reached the collector.
pub fn assert_no_errors(collector: &DiagnosticCollector) {
    let errors = collector.of_severity(Severity::Error);
    assert!(errors.is_empty(), "Expected no errors, got: {errors:?}");
}

/// Asserts how many warnings of one category reached the collector.
pub fn assert_warning_count(collector: &DiagnosticCollector, warning: Warning, expected: usize) {
    let actual = collector
        .of_severity(Severity::Warning)
        .iter()
        .filter(|d| d.warning == Some(warning))
        .count();
    assert_eq!(
        actual, expected,
        "Expected {expected} {warning} warnings, got {actual}"
    );
}
