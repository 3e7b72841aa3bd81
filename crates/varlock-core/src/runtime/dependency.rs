// crates/varlock-core/src/runtime/dependency.rs
// ============================================================================
// Module: Varlock Dependency
// Description: One depender conditioned on a logic tree over dependee slots.
// Purpose: Couple a depender reference, a slot table, and a logic tree behind
//          a build/lock/evaluate lifecycle.
// Dependencies: crate::{core, interfaces}, slot-logic, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! A dependency answers one question: given the current activation states of
//! its dependees, may its depender be active? Structure is mutable only
//! before [`Dependency::lock`]; locking synthesizes a default logic when none
//! was attached, re-validates every slot reference, and flips the one-way
//! latch. Evaluation resolves each referenced slot's path through the bound
//! registry or repository, then folds the booleans through the logic tree.
//!
//! The lock flag is a latch, not a mutex: concurrent evaluation is safe
//! exactly when the underlying resolver is safe for concurrent reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use slot_logic::EvalError;
use slot_logic::LogicExpr;
use slot_logic::ParseError;
use slot_logic::SlotIndex;
use slot_logic::ValidateError;
use slot_logic::parse_formula;
use thiserror::Error;

use crate::core::object_ref::ObjectRef;
use crate::core::object_ref::ObjectRefError;
use crate::core::slots::SlotError;
use crate::core::slots::SlotTable;
use crate::interfaces::ActivationResolver;
use crate::interfaces::ResolutionError;
use crate::interfaces::Scope;

// ============================================================================
// SECTION: Verbosity
// ============================================================================

/// Per-dependency diagnostic verbosity threshold.
///
/// Controls how much the engine narrates through `tracing`; it never affects
/// error propagation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Informational diagnostics.
    Info,
    /// Per-operation diagnostics.
    Debug,
    /// Per-slot diagnostics.
    Trace,
}

// ============================================================================
// SECTION: Dependency Errors
// ============================================================================

/// Lifecycle violations on a dependency.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// A structural mutation was attempted after locking.
    #[error("dependency is locked; structural mutation is not allowed")]
    AlreadyLocked,
    /// Evaluation was attempted before locking.
    #[error("dependency is not locked; evaluation is not allowed")]
    NotLocked,
}

/// Errors raised by dependency construction, locking, and evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// The reference's scope does not match the dependency's binding.
    #[error("`{reference}` is out of scope for this dependency")]
    ScopeMismatch {
        /// The offending reference.
        reference: ObjectRef,
    },
    /// Locking was attempted with no dependees and no explicit logic.
    #[error("no dependees are registered and no logic is attached")]
    NoDependees,
    /// Lifecycle violation.
    #[error(transparent)]
    State(#[from] StateError),
    /// Slot table violation, including unknown slots found at lock time.
    #[error(transparent)]
    Slot(#[from] SlotError),
    /// Malformed object reference.
    #[error(transparent)]
    Reference(#[from] ObjectRefError),
    /// Malformed logic formula.
    #[error(transparent)]
    Formula(#[from] ParseError),
    /// Structurally incomplete logic tree.
    #[error(transparent)]
    Logic(#[from] EvalError),
    /// The external registry/repository could not resolve a path.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

// ============================================================================
// SECTION: Dependency
// ============================================================================

/// One depender conditioned on a boolean combination of dependee states.
///
/// # Invariants
/// - Structure (dependees, logic) is immutable once locked.
/// - When locked, every slot referenced by the logic tree is bound in the
///   slot table.
#[derive(Debug, Clone)]
pub struct Dependency<R> {
    /// The object whose activation is conditioned.
    depender: ObjectRef,
    /// Binding to the repository or registry that resolves activation.
    scope: Scope<R>,
    /// Dependee references keyed by slot.
    slots: SlotTable,
    /// Enabling condition over the slots; synthesized at lock when absent.
    logic: Option<LogicExpr>,
    /// One-way latch flipped by `lock`.
    locked: bool,
    /// Diagnostic verbosity threshold.
    verbosity: Verbosity,
}

impl<R: ActivationResolver> Dependency<R> {
    /// Creates an unlocked dependency for the given depender.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::ScopeMismatch`] when the depender's scope
    /// does not match the binding.
    pub fn new(depender: ObjectRef, scope: Scope<R>) -> Result<Self, DependencyError> {
        if !scope.admits(depender.scope()) {
            return Err(DependencyError::ScopeMismatch {
                reference: depender,
            });
        }
        Ok(Self {
            depender,
            scope,
            slots: SlotTable::new(),
            logic: None,
            locked: false,
            verbosity: Verbosity::default(),
        })
    }

    /// Registers a dependee, optionally at an explicit slot.
    ///
    /// Without an explicit slot, the smallest unused index is assigned.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyLocked`] once locked,
    /// [`DependencyError::ScopeMismatch`] for an out-of-scope reference, and
    /// [`SlotError`] for slot or path collisions.
    pub fn add_dependee(
        &mut self,
        dependee: ObjectRef,
        slot: Option<SlotIndex>,
    ) -> Result<SlotIndex, DependencyError> {
        if self.locked {
            return Err(StateError::AlreadyLocked.into());
        }
        if !self.scope.admits(dependee.scope()) {
            return Err(DependencyError::ScopeMismatch {
                reference: dependee,
            });
        }
        let assigned = self.slots.add(dependee, slot)?;
        if self.verbosity >= Verbosity::Trace {
            tracing::trace!(depender = %self.depender, slot = assigned, "dependee registered");
        }
        Ok(assigned)
    }

    /// Parses a path and registers it as a dependee.
    ///
    /// # Errors
    ///
    /// As [`Dependency::add_dependee`], plus [`ObjectRefError`] for a
    /// malformed path.
    pub fn add_dependee_by_path(
        &mut self,
        path: &str,
        slot: Option<SlotIndex>,
    ) -> Result<SlotIndex, DependencyError> {
        let dependee = ObjectRef::parse(path)?;
        self.add_dependee(dependee, slot)
    }

    /// Attaches an explicit logic tree, replacing any previous one.
    ///
    /// Slot references are validated at lock time, not here, so logic may be
    /// attached before all dependees are registered.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyLocked`] once locked.
    pub fn set_logic(&mut self, logic: LogicExpr) -> Result<(), DependencyError> {
        if self.locked {
            return Err(StateError::AlreadyLocked.into());
        }
        self.logic = Some(logic);
        Ok(())
    }

    /// Parses a formula and adopts the resulting tree as the logic.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::AlreadyLocked`] once locked and [`ParseError`]
    /// for a malformed formula.
    pub fn build_logic_from_formula(&mut self, formula: &str) -> Result<(), DependencyError> {
        if self.locked {
            return Err(StateError::AlreadyLocked.into());
        }
        let logic = parse_formula(formula)?;
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(depender = %self.depender, %formula, "logic adopted from formula");
        }
        self.logic = Some(logic);
        Ok(())
    }

    /// Locks the dependency, making it evaluable and structurally immutable.
    ///
    /// When no logic was attached, a default is synthesized: a single
    /// dependee passes its state through; two or more dependees are
    /// conjoined in ascending slot order. Every slot referenced by the
    /// logic is then re-validated against the slot table. Locking an
    /// already-locked dependency is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::NoDependees`] when there is nothing to
    /// synthesize from, and [`SlotError::UnknownSlot`] for the first logic
    /// reference absent from the slot table; the dependency stays unlocked
    /// on failure.
    pub fn lock(&mut self) -> Result<(), DependencyError> {
        if self.locked {
            return Ok(());
        }
        if let Some(logic) = self.logic.as_ref() {
            let declared = self.slots.all_slots();
            logic.validate(&declared).map_err(|err| match err {
                ValidateError::UnknownSlot(slot) => {
                    DependencyError::Slot(SlotError::UnknownSlot(slot))
                }
                ValidateError::Incomplete {
                    operator,
                } => DependencyError::Logic(EvalError::Incomplete {
                    operator,
                }),
            })?;
        } else {
            let default_logic = self.default_logic()?;
            if self.verbosity >= Verbosity::Debug {
                tracing::debug!(
                    depender = %self.depender,
                    formula = %default_logic,
                    "default logic installed"
                );
            }
            self.logic = Some(default_logic);
        }
        self.locked = true;
        Ok(())
    }

    /// Synthesizes the default logic from the registered dependees.
    fn default_logic(&self) -> Result<LogicExpr, DependencyError> {
        let slots: Vec<SlotIndex> = self.slots.all_slots().into_iter().collect();
        match slots.as_slice() {
            [] => Err(DependencyError::NoDependees),
            [only] => Ok(LogicExpr::slot(*only)),
            _ => Ok(LogicExpr::and(slots.into_iter().map(LogicExpr::slot).collect())),
        }
    }

    /// Evaluates whether the depender is currently enabled.
    ///
    /// Each slot referenced by the logic is resolved through the bound
    /// registry/repository exactly once, then the booleans are folded
    /// through the tree.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotLocked`] before [`Dependency::lock`] and
    /// propagates [`ResolutionError`] from the activation backend.
    pub fn evaluate(&self) -> Result<bool, DependencyError> {
        if !self.locked {
            return Err(StateError::NotLocked.into());
        }
        let logic = self.logic.as_ref().ok_or(StateError::NotLocked)?;

        let mut states: BTreeMap<SlotIndex, bool> = BTreeMap::new();
        for slot in logic.collect_slots() {
            let reference = self.slots.get(slot).ok_or(SlotError::UnknownSlot(slot))?;
            let active = self.scope.resolver().resolve_activation(reference.path())?;
            if self.verbosity >= Verbosity::Trace {
                tracing::trace!(
                    depender = %self.depender,
                    slot,
                    dependee = %reference,
                    active,
                    "slot resolved"
                );
            }
            states.insert(slot, active);
        }

        let enabled = logic.eval(&states)?;
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(depender = %self.depender, enabled, "dependency evaluated");
        }
        Ok(enabled)
    }
}

impl<R> Dependency<R> {
    /// Returns the depender reference.
    #[must_use]
    pub const fn depender(&self) -> &ObjectRef {
        &self.depender
    }

    /// Returns the slot table.
    #[must_use]
    pub const fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Returns the attached logic tree, if any.
    #[must_use]
    pub const fn logic(&self) -> Option<&LogicExpr> {
        self.logic.as_ref()
    }

    /// Returns whether the dependency has been locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns whether the dependency is bound to a single registry.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.scope.is_local()
    }

    /// Returns the diagnostic verbosity threshold.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Sets the diagnostic verbosity threshold.
    pub const fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }
}
