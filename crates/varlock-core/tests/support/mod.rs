// crates/varlock-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers for Varlock core integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers: Result-based assertions and a failing activation
//! resolver mock.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only helpers; not every integration test uses every helper."
)]

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use varlock_core::ActivationResolver;
use varlock_core::ResolutionError;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across Varlock core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Resolver Mocks
// ========================================================================

/// Builds an activation map from path/state pairs.
pub fn activations(entries: &[(&str, bool)]) -> BTreeMap<String, bool> {
    entries.iter().map(|(path, state)| ((*path).to_string(), *state)).collect()
}

/// Resolver that fails every lookup with a backend error.
#[derive(Debug, Clone, Copy)]
pub struct FailingResolver;

impl ActivationResolver for FailingResolver {
    fn resolve_activation(&self, path: &str) -> Result<bool, ResolutionError> {
        Err(ResolutionError::Backend(format!("unreachable backend for `{path}`")))
    }
}
