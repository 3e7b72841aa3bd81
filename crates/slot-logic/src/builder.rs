// crates/slot-logic/src/builder.rs
// ============================================================================
// Module: Slot Logic Builder
// Description: Port-addressed incremental construction of logic trees.
// Purpose: Let callers wire operator nodes and slot leaves onto numbered
//          input ports before the tree is finalized.
// Dependencies: crate::{error, expr}
// ============================================================================

//! ## Overview
//! The builder assembles a [`LogicExpr`] incrementally: operator nodes are
//! created with [`LogicBuilder::connect`], slot leaves with
//! [`LogicBuilder::connect_slot`], each attached to an explicit input port of
//! its parent. Ports order the operands; [`LogicBuilder::finish`] emits them
//! in ascending port order. Slot existence is deliberately not checked here —
//! logic may be built before all dependees are registered, and the owning
//! dependency re-validates every slot reference at lock time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::error::BuildError;
use crate::expr::LogicExpr;
use crate::expr::OpKind;
use crate::expr::SlotIndex;

// ============================================================================
// SECTION: Node Handles
// ============================================================================

/// Handle to a node under construction inside a [`LogicBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Child wired onto an input port.
#[derive(Debug, Clone, Copy)]
enum Wired {
    /// Interior operator node, by builder index.
    Operator(usize),
    /// Slot leaf.
    Slot(SlotIndex),
}

/// Operator node under construction.
#[derive(Debug)]
struct BuilderNode {
    /// Operator kind of this node.
    kind: OpKind,
    /// Children keyed by input port.
    ports: BTreeMap<u32, Wired>,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Incremental, port-addressed builder for [`LogicExpr`] trees.
#[derive(Debug)]
pub struct LogicBuilder {
    /// All operator nodes created so far; index 0 is the root.
    nodes: Vec<BuilderNode>,
}

impl LogicBuilder {
    /// Creates a builder whose root is a new operator node of the given kind.
    #[must_use]
    pub fn new(kind: OpKind) -> Self {
        Self {
            nodes: vec![BuilderNode {
                kind,
                ports: BTreeMap::new(),
            }],
        }
    }

    /// Returns the handle of the root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a new operator node and wires it onto an input port of
    /// `parent`.
    ///
    /// # Errors
    /// Returns [`BuildError::UnknownNode`] for a foreign handle,
    /// [`BuildError::PortOccupied`] when the port is already wired, and
    /// [`BuildError::ArityExceeded`] when `parent` is a `not` node that
    /// already has its operand.
    pub fn connect(
        &mut self,
        parent: NodeId,
        port: u32,
        kind: OpKind,
    ) -> Result<NodeId, BuildError> {
        let child_index = self.nodes.len();
        self.wire(parent, port, Wired::Operator(child_index))?;
        self.nodes.push(BuilderNode {
            kind,
            ports: BTreeMap::new(),
        });
        Ok(NodeId(child_index))
    }

    /// Wires a slot leaf onto an input port of `parent`.
    ///
    /// The slot index is taken as-is; whether it exists in the owning slot
    /// table is checked by the dependency at lock time.
    ///
    /// # Errors
    /// Returns [`BuildError::UnknownNode`] for a foreign handle,
    /// [`BuildError::PortOccupied`] when the port is already wired, and
    /// [`BuildError::ArityExceeded`] when `parent` is a `not` node that
    /// already has its operand.
    pub fn connect_slot(
        &mut self,
        parent: NodeId,
        port: u32,
        slot: SlotIndex,
    ) -> Result<(), BuildError> {
        self.wire(parent, port, Wired::Slot(slot))
    }

    /// Wires a child onto a port, enforcing occupancy and arity.
    fn wire(&mut self, parent: NodeId, port: u32, child: Wired) -> Result<(), BuildError> {
        let node = self.nodes.get_mut(parent.0).ok_or(BuildError::UnknownNode)?;
        if node.ports.contains_key(&port) {
            return Err(BuildError::PortOccupied {
                port,
            });
        }
        if node.kind == OpKind::Not && !node.ports.is_empty() {
            return Err(BuildError::ArityExceeded {
                operator: OpKind::Not,
            });
        }
        node.ports.insert(port, child);
        Ok(())
    }

    /// Finalizes the builder into an expression tree.
    ///
    /// Operands are emitted in ascending port order. An operand-less
    /// `and`/`or`/`xor` node is permitted here and rejected later by
    /// validation or evaluation; a `not` node must have its operand.
    ///
    /// # Errors
    /// Returns [`BuildError::MissingOperand`] when a `not` node has no child.
    pub fn finish(self) -> Result<LogicExpr, BuildError> {
        self.emit(0)
    }

    /// Recursively converts a builder node into a [`LogicExpr`].
    fn emit(&self, index: usize) -> Result<LogicExpr, BuildError> {
        let node = self.nodes.get(index).ok_or(BuildError::UnknownNode)?;
        let mut operands = Vec::with_capacity(node.ports.len());
        for child in node.ports.values() {
            operands.push(match child {
                Wired::Operator(child_index) => self.emit(*child_index)?,
                Wired::Slot(slot) => LogicExpr::Slot(*slot),
            });
        }
        match node.kind {
            OpKind::Not => {
                let operand = operands.into_iter().next().ok_or(BuildError::MissingOperand {
                    operator: OpKind::Not,
                })?;
                Ok(LogicExpr::negate(operand))
            }
            OpKind::And => Ok(LogicExpr::and(operands)),
            OpKind::Or => Ok(LogicExpr::or(operands)),
            OpKind::Xor => Ok(LogicExpr::xor(operands)),
        }
    }
}
