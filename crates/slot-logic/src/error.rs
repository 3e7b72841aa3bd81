// crates/slot-logic/src/error.rs
// ============================================================================
// Module: Slot Logic Error Definitions
// Description: Structured diagnostics for formula parsing, tree building, and
//              evaluation.
// Purpose: Provide positionally precise parse errors and structural failure
//          kinds for the slot algebra.
// Dependencies: crate::expr::OpKind, std::fmt
// ============================================================================

//! ## Overview
//! Centralizes the error types of the slot-logic crate. Parse errors carry
//! byte offsets into the original formula so authoring mistakes can be
//! pinpointed; build and evaluation errors capture the structural invariant
//! that was violated.

use std::fmt;

use crate::expr::OpKind;
use crate::expr::SlotIndex;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors that can occur while parsing a logic formula.
///
/// # Invariants
/// - `position` fields are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or contained only whitespace.
    EmptyFormula,
    /// Input exceeded the configured size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the configured nesting depth.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Actual nesting depth when the error occurred.
        actual_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Operator identifier was not one of `and`, `or`, `xor`, `not`.
    UnknownOperator {
        /// The unrecognized identifier.
        name: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Operator was applied to a number of operands outside its arity.
    ArityMismatch {
        /// The operator whose arity was violated.
        operator: OpKind,
        /// Number of operands actually supplied.
        found: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Slot literal was not a valid non-negative integer, or its brackets
    /// were unbalanced.
    InvalidSlotLiteral {
        /// The offending raw text.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected trailing input after a complete formula.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFormula => write!(f, "formula is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "formula exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                actual_depth,
                position,
            } => write!(
                f,
                "formula nesting exceeds limit: depth {actual_depth} (max {max_depth}) at \
                 {position}"
            ),
            Self::UnknownOperator {
                name,
                position,
            } => {
                write!(f, "unknown operator `{name}` at {position}")
            }
            Self::ArityMismatch {
                operator,
                found,
                position,
            } => match operator {
                OpKind::Not => write!(
                    f,
                    "`not` takes exactly one operand, found {found} at {position}"
                ),
                OpKind::And | OpKind::Or | OpKind::Xor => write!(
                    f,
                    "`{operator}` takes at least one operand, found {found} at {position}"
                ),
            },
            Self::InvalidSlotLiteral {
                raw,
                position,
            } => {
                write!(f, "invalid slot literal `{raw}` at {position}")
            }
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "unexpected token `{found}` at {position}, expected {expected}")
            }
            Self::TrailingInput {
                position,
            } => {
                write!(f, "unexpected trailing input at {position}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// SECTION: Build Errors
// ============================================================================

/// Errors that can occur while assembling a logic tree through the builder.
///
/// # Invariants
/// - None. Variants capture structural construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The referenced node handle does not belong to this builder.
    UnknownNode,
    /// The input port is already wired to a child.
    PortOccupied {
        /// The port that was already connected.
        port: u32,
    },
    /// Attaching the child would exceed the operator's maximum arity.
    ArityExceeded {
        /// The operator whose arity would be exceeded.
        operator: OpKind,
    },
    /// A `not` node was finished without its single operand.
    MissingOperand {
        /// The operator missing an operand.
        operator: OpKind,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode => write!(f, "node handle does not belong to this builder"),
            Self::PortOccupied {
                port,
            } => {
                write!(f, "input port [{port}] is already connected")
            }
            Self::ArityExceeded {
                operator,
            } => {
                write!(f, "`{operator}` accepts at most one operand")
            }
            Self::MissingOperand {
                operator,
            } => {
                write!(f, "`{operator}` was finished without an operand")
            }
        }
    }
}

impl std::error::Error for BuildError {}

// ============================================================================
// SECTION: Evaluation Errors
// ============================================================================

/// Errors that can occur while folding a logic tree into a boolean.
///
/// # Invariants
/// - None. Variants capture evaluation-time structural failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// An interior node has fewer operands than its minimum arity.
    Incomplete {
        /// The operator missing operands.
        operator: OpKind,
    },
    /// The reader has no state for a referenced slot.
    UnboundSlot(SlotIndex),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete {
                operator,
            } => {
                write!(f, "`{operator}` node has no operands")
            }
            Self::UnboundSlot(slot) => {
                write!(f, "no state is bound for slot [{slot}]")
            }
        }
    }
}

impl std::error::Error for EvalError {}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Errors reported by structural validation of a logic tree against a set of
/// declared slots.
///
/// # Invariants
/// - `UnknownSlot` reports the first offending slot in tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateError {
    /// An interior node has fewer operands than its minimum arity.
    Incomplete {
        /// The operator missing operands.
        operator: OpKind,
    },
    /// A leaf references a slot absent from the declared set.
    UnknownSlot(SlotIndex),
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete {
                operator,
            } => {
                write!(f, "`{operator}` node has no operands")
            }
            Self::UnknownSlot(slot) => {
                write!(f, "logic references undeclared slot [{slot}]")
            }
        }
    }
}

impl std::error::Error for ValidateError {}
