// crates/varlock-core/src/lib.rs
// ============================================================================
// Module: Varlock Core Library
// Description: Public API surface for the Varlock dependency engine.
// Purpose: Expose core types, interfaces, and runtime pieces.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Varlock decides whether a configuration option (the depender) may be
//! active, given a boolean combination of the activation states of other
//! options (its dependees). Activation itself is computed by an external
//! registry or repository reached through the [`ActivationResolver`]
//! interface; the engine owns only the slot tables, the logic trees, and the
//! build/lock/evaluate lifecycle around them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::ObjectRef;
pub use crate::core::ObjectRefError;
pub use crate::core::RefScope;
pub use crate::core::SlotError;
pub use crate::core::SlotTable;
pub use interfaces::ActivationResolver;
pub use interfaces::ResolutionError;
pub use interfaces::Scope;
pub use runtime::DependeeRecord;
pub use runtime::Dependency;
pub use runtime::DependencyError;
pub use runtime::DependencyModel;
pub use runtime::DependencyRecord;
pub use runtime::ModelError;
pub use runtime::ModelSpec;
pub use runtime::StateError;
pub use runtime::Verbosity;
