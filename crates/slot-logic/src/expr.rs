// crates/slot-logic/src/expr.rs
// ============================================================================
// Module: Slot Logic Expression Tree
// Description: Boolean operator tree over slot-indexed leaves.
// Purpose: Define `LogicExpr`, its evaluation fold, structural validation,
//          and the canonical formula rendering.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the closed operator algebra of the dependency engine:
//! `and`, `or`, `xor`, and `not` over slot leaves. Slots are small integers
//! resolved by the caller through the [`SlotRead`] trait, which keeps the
//! tree decoupled from the identity of the objects the slots stand for.
//! Arity is structural where possible (`not` holds exactly one boxed child);
//! the remaining minimum-arity invariant is enforced by [`LogicExpr::eval`]
//! and [`LogicExpr::validate`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::EvalError;
use crate::error::ValidateError;

// ============================================================================
// SECTION: Slot Index
// ============================================================================

/// Slot handle referenced by logic leaves and resolved through a slot table.
pub type SlotIndex = u32;

// ============================================================================
// SECTION: Operator Kinds
// ============================================================================

/// Operator kinds supported by the logic algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Conjunction: all operands must hold.
    And,
    /// Disjunction: at least one operand must hold.
    Or,
    /// Parity: an odd number of operands must hold.
    Xor,
    /// Negation: exactly one operand, inverted.
    Not,
}

impl OpKind {
    /// Returns the lower-case operator keyword.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
        }
    }

    /// Resolves a case-insensitive operator keyword.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if name.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else if name.eq_ignore_ascii_case("xor") {
            Some(Self::Xor)
        } else if name.eq_ignore_ascii_case("not") {
            Some(Self::Not)
        } else {
            None
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Slot Reader
// ============================================================================

/// Resolves slot indices to their current boolean state.
///
/// Implement this for your slot-state source so a logic tree can be folded
/// without knowing what the slots stand for.
pub trait SlotRead {
    /// Returns the state bound to the given slot, or `None` if unbound.
    fn slot_state(&self, slot: SlotIndex) -> Option<bool>;
}

impl<S: BuildHasher> SlotRead for HashMap<SlotIndex, bool, S> {
    fn slot_state(&self, slot: SlotIndex) -> Option<bool> {
        self.get(&slot).copied()
    }
}

impl SlotRead for BTreeMap<SlotIndex, bool> {
    fn slot_state(&self, slot: SlotIndex) -> Option<bool> {
        self.get(&slot).copied()
    }
}

impl<F> SlotRead for F
where
    F: Fn(SlotIndex) -> Option<bool>,
{
    fn slot_state(&self, slot: SlotIndex) -> Option<bool> {
        (self)(slot)
    }
}

// ============================================================================
// SECTION: Expression Definition
// ============================================================================

/// Boolean operator tree over slot-indexed leaves.
///
/// The operator set is closed: evaluation and rendering match exhaustively,
/// so no unrecognized node kind can reach the fold. `Not` holds exactly one
/// child by construction; `And`/`Or`/`Xor` accept one or more children, with
/// the single-operand forms passing the operand through (`xor` of one
/// operand is the identity under its parity semantics).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicExpr {
    /// Leaf referencing a slot-table entry.
    Slot(SlotIndex),
    /// Negation of a single operand.
    Not(Box<Self>),
    /// Conjunction over one or more operands.
    And(SmallVec<[Box<Self>; 4]>),
    /// Disjunction over one or more operands.
    Or(SmallVec<[Box<Self>; 4]>),
    /// Odd-parity combination over one or more operands.
    Xor(SmallVec<[Box<Self>; 4]>),
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl LogicExpr {
    /// Creates a slot leaf.
    #[must_use]
    pub const fn slot(slot: SlotIndex) -> Self {
        Self::Slot(slot)
    }

    /// Creates a negation of the given operand.
    #[must_use]
    pub fn negate(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Creates a conjunction of the given operands.
    #[must_use]
    pub fn and(operands: Vec<Self>) -> Self {
        Self::And(operands.into_iter().map(Box::new).collect())
    }

    /// Creates a disjunction of the given operands.
    #[must_use]
    pub fn or(operands: Vec<Self>) -> Self {
        Self::Or(operands.into_iter().map(Box::new).collect())
    }

    /// Creates an odd-parity combination of the given operands.
    #[must_use]
    pub fn xor(operands: Vec<Self>) -> Self {
        Self::Xor(operands.into_iter().map(Box::new).collect())
    }

    /// Returns the operator kind of an interior node, or `None` for a leaf.
    #[must_use]
    pub const fn op_kind(&self) -> Option<OpKind> {
        match self {
            Self::Slot(_) => None,
            Self::Not(_) => Some(OpKind::Not),
            Self::And(_) => Some(OpKind::And),
            Self::Or(_) => Some(OpKind::Or),
            Self::Xor(_) => Some(OpKind::Xor),
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl LogicExpr {
    /// Folds the tree into a boolean using the given slot reader.
    ///
    /// The fold is short-circuit free: every operand is evaluated, so an
    /// unbound slot anywhere in the tree is always reported.
    ///
    /// # Errors
    /// Returns [`EvalError::Incomplete`] when an interior node has no
    /// operands, and [`EvalError::UnboundSlot`] when the reader has no state
    /// for a referenced slot.
    pub fn eval<R: SlotRead>(&self, reader: &R) -> Result<bool, EvalError> {
        match self {
            Self::Slot(slot) => reader.slot_state(*slot).ok_or(EvalError::UnboundSlot(*slot)),
            Self::Not(operand) => Ok(!operand.eval(reader)?),
            Self::And(operands) => {
                if operands.is_empty() {
                    return Err(EvalError::Incomplete {
                        operator: OpKind::And,
                    });
                }
                let mut all = true;
                for operand in operands {
                    all &= operand.eval(reader)?;
                }
                Ok(all)
            }
            Self::Or(operands) => {
                if operands.is_empty() {
                    return Err(EvalError::Incomplete {
                        operator: OpKind::Or,
                    });
                }
                let mut any = false;
                for operand in operands {
                    any |= operand.eval(reader)?;
                }
                Ok(any)
            }
            Self::Xor(operands) => {
                if operands.is_empty() {
                    return Err(EvalError::Incomplete {
                        operator: OpKind::Xor,
                    });
                }
                let mut parity = false;
                for operand in operands {
                    parity ^= operand.eval(reader)?;
                }
                Ok(parity)
            }
        }
    }

    /// Validates the tree against a set of declared slots.
    ///
    /// Checks the minimum-arity invariant on every interior node and that
    /// every leaf references a declared slot. The first offense in tree
    /// order is reported.
    ///
    /// # Errors
    /// Returns [`ValidateError::Incomplete`] for an operand-less interior
    /// node and [`ValidateError::UnknownSlot`] for an undeclared slot.
    pub fn validate(&self, declared: &BTreeSet<SlotIndex>) -> Result<(), ValidateError> {
        match self {
            Self::Slot(slot) => {
                if declared.contains(slot) {
                    Ok(())
                } else {
                    Err(ValidateError::UnknownSlot(*slot))
                }
            }
            Self::Not(operand) => operand.validate(declared),
            Self::And(operands) | Self::Or(operands) | Self::Xor(operands) => {
                if operands.is_empty() {
                    return Err(ValidateError::Incomplete {
                        operator: match self {
                            Self::And(_) => OpKind::And,
                            Self::Or(_) => OpKind::Or,
                            _ => OpKind::Xor,
                        },
                    });
                }
                for operand in operands {
                    operand.validate(declared)?;
                }
                Ok(())
            }
        }
    }

    /// Collects the distinct slot indices referenced by the tree, in
    /// first-appearance order.
    #[must_use]
    pub fn collect_slots(&self) -> Vec<SlotIndex> {
        let mut out = Vec::new();
        self.collect_slots_inner(&mut out);
        out
    }

    /// Walks the tree and appends unseen slot indices.
    fn collect_slots_inner(&self, out: &mut Vec<SlotIndex>) {
        match self {
            Self::Slot(slot) => {
                if !out.contains(slot) {
                    out.push(*slot);
                }
            }
            Self::Not(operand) => operand.collect_slots_inner(out),
            Self::And(operands) | Self::Or(operands) | Self::Xor(operands) => {
                for operand in operands {
                    operand.collect_slots_inner(out);
                }
            }
        }
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Self::Slot(_) => 1,
            Self::Not(operand) => 1 + operand.complexity(),
            Self::And(operands) | Self::Or(operands) | Self::Xor(operands) => {
                1 + operands.iter().map(|operand| operand.complexity()).sum::<usize>()
            }
        }
    }
}

// ============================================================================
// SECTION: Canonical Rendering
// ============================================================================

impl LogicExpr {
    /// Renders the canonical lower-case formula for this tree.
    ///
    /// Slots are always rendered bracketed (`[7]`), operators lower-case and
    /// parenthesized. Parsing the rendered formula reproduces the tree
    /// structure exactly.
    #[must_use]
    pub fn formula(&self) -> String {
        self.to_string()
    }

    /// Writes the operands of an interior node as a comma-separated list.
    fn fmt_operands(
        operands: &SmallVec<[Box<Self>; 4]>,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (index, operand) in operands.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            fmt::Display::fmt(operand, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for LogicExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot(slot) => write!(f, "[{slot}]"),
            Self::Not(operand) => write!(f, "not({operand})"),
            Self::And(operands) => {
                f.write_str("and(")?;
                Self::fmt_operands(operands, f)?;
                f.write_str(")")
            }
            Self::Or(operands) => {
                f.write_str("or(")?;
                Self::fmt_operands(operands, f)?;
                f.write_str(")")
            }
            Self::Xor(operands) => {
                f.write_str("xor(")?;
                Self::fmt_operands(operands, f)?;
                f.write_str(")")
            }
        }
    }
}
