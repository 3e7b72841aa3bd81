// crates/slot-logic/src/lib.rs
// ============================================================================
// Module: Slot Logic Root
// Description: Public API surface for the slot logic algebra.
// Purpose: Wire together the expression tree, builder, parser, and errors.
// Dependencies: crate::{builder, error, expr, parser}
// ============================================================================

//! ## Overview
//! Slot logic is a small, closed boolean algebra (`and`, `or`, `xor`, `not`)
//! over integer-indexed leaves called slots. It is the expression layer of a
//! configuration dependency engine: trees are built programmatically through
//! a port-addressed builder or parsed from compact formulas such as
//! `and([0],or([3],[12]))`, then folded into a boolean against a slot-state
//! reader supplied by the caller. The crate knows nothing about what slots
//! stand for; binding slots to real objects is the caller's concern.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod error;
pub mod expr;
pub mod parser;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::LogicBuilder;
pub use builder::NodeId;
pub use error::BuildError;
pub use error::EvalError;
pub use error::ParseError;
pub use error::ValidateError;
pub use expr::LogicExpr;
pub use expr::OpKind;
pub use expr::SlotIndex;
pub use expr::SlotRead;
pub use parser::parse_formula;
