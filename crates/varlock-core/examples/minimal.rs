// crates/varlock-core/examples/minimal.rs
// ============================================================================
// Module: Varlock Minimal Example
// Description: Minimal end-to-end dependency model over an in-memory resolver.
// Purpose: Demonstrate record declaration, initialization, and evaluation.
// Dependencies: varlock-core
// ============================================================================

//! ## Overview
//! Initializes a dependency model from hand-built records against a map
//! resolver and evaluates both dependers. This example is backend-agnostic
//! and suitable for quick verification.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use varlock_core::DependeeRecord;
use varlock_core::DependencyModel;
use varlock_core::DependencyRecord;
use varlock_core::ModelSpec;
use varlock_core::Scope;
use varlock_core::Verbosity;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Builds the minimal model specification for the example run.
fn build_spec() -> ModelSpec {
    ModelSpec {
        dependees: vec![
            DependeeRecord {
                slot: 0,
                path: "geometry:has_detector_0/if_detector".to_string(),
            },
            DependeeRecord {
                slot: 1,
                path: "geometry:has_detector_1/if_detector".to_string(),
            },
        ],
        dependencies: vec![DependencyRecord {
            name: "detector_pair".to_string(),
            depender_path: "analysis:pairing/if_active".to_string(),
            input_slots: BTreeSet::from([0, 1]),
            logic_expression: Some("and([0],[1])".to_string()),
            logging: Verbosity::Warn,
        }],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let activations: BTreeMap<String, bool> = [
        ("geometry:has_detector_0/if_detector".to_string(), true),
        ("geometry:has_detector_1/if_detector".to_string(), true),
    ]
    .into_iter()
    .collect();

    let mut model = DependencyModel::new(Scope::Repository(&activations));
    model.initialize(build_spec())?;

    if !model.evaluate("analysis:pairing/if_active")? {
        return Err(Box::new(ExampleError("expected the pairing depender to be enabled")));
    }

    let report = model.render_report();
    if !report.contains("detector_pair") {
        return Err(Box::new(ExampleError("expected the report to list the dependency")));
    }
    Ok(())
}
