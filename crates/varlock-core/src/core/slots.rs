// crates/varlock-core/src/core/slots.rs
// ============================================================================
// Module: Varlock Slot Table
// Description: Mapping from slot indices to object references.
// Purpose: Decouple logic trees from object identity by letting logic nodes
//          mention small integers instead of full paths.
// Dependencies: crate::core::object_ref, slot-logic, serde, thiserror
// ============================================================================

//! ## Overview
//! A slot table binds the slot indices used inside a logic tree to the
//! object references they stand for. Slots are unique, paths are unique, and
//! automatic assignment always picks the smallest unused index so table
//! contents are independent of registration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use slot_logic::SlotIndex;
use thiserror::Error;

use crate::core::object_ref::ObjectRef;

// ============================================================================
// SECTION: Slot Errors
// ============================================================================

/// Errors that can occur while registering or resolving slots.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// An explicit slot index is already bound to a different path.
    #[error("slot [{slot}] is already bound to `{existing}`")]
    DuplicateSlot {
        /// The requested slot index.
        slot: SlotIndex,
        /// The reference already bound at that index.
        existing: ObjectRef,
    },
    /// The path is already registered at another slot.
    #[error("`{reference}` is already registered at slot [{slot}]")]
    DuplicatePath {
        /// The reference that was re-added.
        reference: ObjectRef,
        /// The slot it already occupies.
        slot: SlotIndex,
    },
    /// A logic tree references a slot absent from the table.
    #[error("logic references unknown slot [{0}]")]
    UnknownSlot(SlotIndex),
}

// ============================================================================
// SECTION: Slot Table
// ============================================================================

/// Mapping from slot indices to object references.
///
/// # Invariants
/// - Each slot index is bound to at most one reference.
/// - Each path appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTable {
    /// Slot bindings in ascending index order.
    slots: BTreeMap<SlotIndex, ObjectRef>,
}

impl SlotTable {
    /// Creates an empty slot table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Registers a reference at the given slot, or at the smallest unused
    /// slot when none is given.
    ///
    /// Re-adding the same path at the same explicit slot is idempotent and
    /// returns the existing index.
    ///
    /// # Errors
    /// Returns [`SlotError::DuplicateSlot`] when an explicit index is taken
    /// by a different path, and [`SlotError::DuplicatePath`] when the path is
    /// already registered elsewhere.
    pub fn add(
        &mut self,
        reference: ObjectRef,
        slot: Option<SlotIndex>,
    ) -> Result<SlotIndex, SlotError> {
        if let Some(existing_slot) = self.slot_of(reference.path()) {
            if slot == Some(existing_slot) {
                return Ok(existing_slot);
            }
            return Err(SlotError::DuplicatePath {
                reference,
                slot: existing_slot,
            });
        }

        let index = match slot {
            Some(requested) => {
                if let Some(existing) = self.slots.get(&requested) {
                    return Err(SlotError::DuplicateSlot {
                        slot: requested,
                        existing: existing.clone(),
                    });
                }
                requested
            }
            None => self.next_free_slot(),
        };
        self.slots.insert(index, reference);
        Ok(index)
    }

    /// Returns the smallest slot index not currently bound.
    fn next_free_slot(&self) -> SlotIndex {
        let mut candidate: SlotIndex = 0;
        for bound in self.slots.keys() {
            if *bound == candidate {
                candidate += 1;
            } else if *bound > candidate {
                break;
            }
        }
        candidate
    }

    /// Returns the reference bound at a slot.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&ObjectRef> {
        self.slots.get(&slot)
    }

    /// Returns whether a path is registered.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.slot_of(path).is_some()
    }

    /// Returns the slot a path is registered at.
    #[must_use]
    pub fn slot_of(&self, path: &str) -> Option<SlotIndex> {
        self.slots
            .iter()
            .find(|(_, reference)| reference.path() == path)
            .map(|(slot, _)| *slot)
    }

    /// Returns the set of bound slot indices in ascending order.
    #[must_use]
    pub fn all_slots(&self) -> BTreeSet<SlotIndex> {
        self.slots.keys().copied().collect()
    }

    /// Returns the number of bound slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the table has no bound slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates the bindings in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &ObjectRef)> {
        self.slots.iter().map(|(slot, reference)| (*slot, reference))
    }
}
