// crates/varlock-core/src/core/object_ref.rs
// ============================================================================
// Module: Varlock Object References
// Description: Opaque scoped identifiers for configurable objects.
// Purpose: Provide comparable, serializable references with stable textual
//          round trips.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An object reference names a configurable object — a variant, a parameter,
//! a value group — by its scope and path. Path syntax is owned by the
//! external registry; this module only classifies the scope (a global path
//! carries a `registry:` prefix, a local path does not) and otherwise treats
//! the text as an opaque comparable string that round-trips through
//! [`fmt::Display`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Reference Scope
// ============================================================================

/// Scope of an object reference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RefScope {
    /// Repository-wide path carrying a registry prefix (`registry:local/path`).
    Global,
    /// Path local to a single registry (`local/path`).
    Local,
}

// ============================================================================
// SECTION: Object Reference
// ============================================================================

/// Errors that can occur while constructing an [`ObjectRef`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectRefError {
    /// The path was empty or contained only whitespace.
    #[error("object reference path is empty")]
    EmptyPath,
}

/// Opaque, comparable reference to a configurable object.
///
/// # Invariants
/// - The path is non-empty.
/// - Ordering and equality are over (scope, path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectRef {
    /// Whether the path is repository-wide or registry-local.
    scope: RefScope,
    /// The full path text, kept exactly as supplied.
    path: String,
}

impl ObjectRef {
    /// Parses a scoped path string into a reference.
    ///
    /// A `:` separator marks a repository-wide path; anything else is local.
    /// The text is kept verbatim so formatting round-trips.
    ///
    /// # Errors
    /// Returns [`ObjectRefError::EmptyPath`] for empty or whitespace-only
    /// input.
    pub fn parse(text: &str) -> Result<Self, ObjectRefError> {
        if text.trim().is_empty() {
            return Err(ObjectRefError::EmptyPath);
        }
        let scope = if text.contains(':') { RefScope::Global } else { RefScope::Local };
        Ok(Self {
            scope,
            path: text.to_string(),
        })
    }

    /// Returns the scope of this reference.
    #[must_use]
    pub const fn scope(&self) -> RefScope {
        self.scope
    }

    /// Returns the full path text.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns whether this reference is repository-wide.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self.scope, RefScope::Global)
    }

    /// Returns whether this reference is local to a single registry.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self.scope, RefScope::Local)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for ObjectRef {
    type Err = ObjectRefError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl TryFrom<String> for ObjectRef {
    type Error = ObjectRefError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<ObjectRef> for String {
    fn from(reference: ObjectRef) -> Self {
        reference.path
    }
}
