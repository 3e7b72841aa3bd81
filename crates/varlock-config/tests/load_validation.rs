// crates/varlock-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: TOML parsing, limit enforcement, and spec conversion coverage.
// Purpose: Ensure configuration loading fails closed and feeds the model
//          the documented record set.
// Dependencies: varlock-config, varlock-core, tempfile
// ============================================================================
//! ## Overview
//! Integration tests for strict configuration loading: grammar, unknown-field
//! rejection, limits, and the conversion into model records, including one
//! end-to-end initialization through the core model.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::BTreeMap;
use std::io::Write as _;

use support::TestResult;
use support::ensure;
use varlock_config::ConfigError;
use varlock_config::ModelConfig;
use varlock_core::DependencyModel;
use varlock_core::ModelError;
use varlock_core::Scope;
use varlock_core::Verbosity;

/// A well-formed two-dependency document.
const SAMPLE: &str = r#"
logging = "info"

[[dependees]]
slot = 0
variant = "geometry:has_detector_0/if_detector"

[[dependees]]
slot = 1
variant = "geometry:has_detector_1/if_detector"

[[dependencies]]
name = "detector_pair"
depender = "analysis:pairing/if_active"
slots = [0, 1]
logic = "and([0],[1])"
logging = "debug"

[[dependencies]]
name = "solo"
depender = "analysis:solo/if_active"
slots = [0]
"#;

/// Parsing a well-formed document yields the declared records.
#[test]
fn test_parse_sample_document() -> TestResult {
    let config = ModelConfig::from_toml_str(SAMPLE)?;
    ensure(config.dependees.len() == 2, "Expected two dependee entries")?;
    ensure(config.dependencies.len() == 2, "Expected two dependency entries")?;
    ensure(config.logging == Some(Verbosity::Info), "Expected the document default logging")?;

    let spec = config.into_spec();
    ensure(spec.dependencies[0].logging == Verbosity::Debug, "Expected per-entry logging")?;
    ensure(
        spec.dependencies[1].logging == Verbosity::Info,
        "Expected the document default to fill unset entries",
    )?;
    ensure(
        spec.dependencies[0].logic_expression.as_deref() == Some("and([0],[1])"),
        "Expected the formula to be carried",
    )?;
    ensure(spec.dependencies[1].logic_expression.is_none(), "Expected absent formula")?;
    Ok(())
}

/// Unknown fields are rejected rather than ignored.
#[test]
fn test_unknown_fields_rejected() -> TestResult {
    let err = ModelConfig::from_toml_str(
        r#"
[[dependees]]
slot = 0
variant = "core:a"
surprise = true
"#,
    )
    .unwrap_err();
    ensure(matches!(err, ConfigError::Parse(_)), "Expected unknown field to fail parsing")?;
    Ok(())
}

/// Empty names, paths, and slot lists fail validation.
#[test]
fn test_empty_fields_rejected() -> TestResult {
    let err = ModelConfig::from_toml_str(
        r#"
[[dependees]]
slot = 0
variant = ""
"#,
    )
    .unwrap_err();
    ensure(matches!(err, ConfigError::Invalid(_)), "Expected empty variant rejection")?;

    let err = ModelConfig::from_toml_str(
        r#"
[[dependencies]]
name = "x"
depender = "core:x"
slots = []
"#,
    )
    .unwrap_err();
    ensure(matches!(err, ConfigError::Invalid(_)), "Expected empty slot list rejection")?;
    Ok(())
}

/// Oversized formulas fail validation.
#[test]
fn test_formula_length_limit() -> TestResult {
    let formula = format!("and({})", "0,".repeat(4096));
    let document = format!(
        r#"
[[dependencies]]
name = "big"
depender = "core:x"
slots = [0]
logic = "{formula}"
"#
    );
    let err = ModelConfig::from_toml_str(&document).unwrap_err();
    ensure(matches!(err, ConfigError::Invalid(_)), "Expected formula length rejection")?;
    Ok(())
}

/// Loading goes through the same validation as string parsing.
#[test]
fn test_load_from_disk() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SAMPLE.as_bytes())?;
    let config = ModelConfig::load(file.path())?;
    ensure(config.dependencies.len() == 2, "Expected the loaded document to match")?;

    let missing = ModelConfig::load(std::path::Path::new("/nonexistent/varlock.toml"));
    ensure(
        matches!(missing.unwrap_err(), ConfigError::Io(_)),
        "Expected Io for a missing file",
    )?;
    Ok(())
}

/// A loaded document initializes a model end to end.
#[test]
fn test_document_initializes_model() -> TestResult {
    let activations: BTreeMap<String, bool> = [
        ("geometry:has_detector_0/if_detector".to_string(), true),
        ("geometry:has_detector_1/if_detector".to_string(), false),
    ]
    .into_iter()
    .collect();

    let config = ModelConfig::from_toml_str(SAMPLE)?;
    let mut model = DependencyModel::new(Scope::Repository(&activations));
    model.initialize(config.into_spec())?;

    ensure(
        !model.evaluate("analysis:pairing/if_active")?,
        "Expected conjunction to fail with one inactive dependee",
    )?;
    ensure(
        model.evaluate("analysis:solo/if_active")?,
        "Expected pass-through of the active dependee",
    )?;
    Ok(())
}

/// A document referencing an undeclared slot fails model initialization.
#[test]
fn test_undeclared_slot_fails_initialization() -> TestResult {
    let config = ModelConfig::from_toml_str(
        r#"
[[dependees]]
slot = 0
variant = "core:a"

[[dependees]]
slot = 1
variant = "core:b"

[[dependencies]]
name = "broken"
depender = "core:x"
slots = [9]
"#,
    )?;

    let activations: BTreeMap<String, bool> = BTreeMap::new();
    let mut model = DependencyModel::new(Scope::Repository(&activations));
    let err = model.initialize(config.into_spec()).unwrap_err();
    ensure(
        matches!(
            err,
            ModelError::UnknownDependeeSlot {
                slot: 9,
                ..
            }
        ),
        "Expected UnknownDependeeSlot from the model",
    )?;
    ensure(model.dependencies().is_empty(), "Expected no partial realization")?;
    Ok(())
}
