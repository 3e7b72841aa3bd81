// crates/varlock-core/src/interfaces/mod.rs
// ============================================================================
// Module: Varlock Interfaces
// Description: Backend-agnostic interfaces for activation resolution.
// Purpose: Define the contract surface between the dependency engine and the
//          external variant registry/repository.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engine never computes activation itself: it asks an external
//! registry or repository, through an opaque path, whether an object is
//! currently active. Implementations must be read-only and deterministic for
//! the duration of an evaluation; the engine performs no caching and calls
//! the resolver once per referenced slot per evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

use thiserror::Error;

use crate::core::object_ref::RefScope;

// ============================================================================
// SECTION: Activation Resolver
// ============================================================================

/// Activation resolution errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No configuration object is registered at the path.
    #[error("no configuration object is registered at `{path}`")]
    UnknownPath {
        /// The unresolved path.
        path: String,
    },
    /// The backing registry or repository reported an error.
    #[error("activation backend error: {0}")]
    Backend(String),
}

/// Backend-agnostic activation state lookup.
pub trait ActivationResolver {
    /// Returns the current activation state of the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when the path cannot be resolved.
    fn resolve_activation(&self, path: &str) -> Result<bool, ResolutionError>;
}

impl<T: ActivationResolver + ?Sized> ActivationResolver for &T {
    fn resolve_activation(&self, path: &str) -> Result<bool, ResolutionError> {
        (**self).resolve_activation(path)
    }
}

impl<S: BuildHasher> ActivationResolver for HashMap<String, bool, S> {
    fn resolve_activation(&self, path: &str) -> Result<bool, ResolutionError> {
        self.get(path).copied().ok_or_else(|| ResolutionError::UnknownPath {
            path: path.to_string(),
        })
    }
}

impl ActivationResolver for BTreeMap<String, bool> {
    fn resolve_activation(&self, path: &str) -> Result<bool, ResolutionError> {
        self.get(path).copied().ok_or_else(|| ResolutionError::UnknownPath {
            path: path.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Binding Scope
// ============================================================================

/// Binding of a dependency or model to its activation source.
///
/// The two variants make the repository-or-registry exclusivity structural:
/// a value is bound to exactly one of the two, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<R> {
    /// Repository-wide binding; references carry registry prefixes.
    Repository(R),
    /// Binding local to a single registry; references are registry-local.
    Registry(R),
}

impl<R> Scope<R> {
    /// Returns the bound resolver.
    pub const fn resolver(&self) -> &R {
        match self {
            Self::Repository(resolver) | Self::Registry(resolver) => resolver,
        }
    }

    /// Returns whether this scope is local to a single registry.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Registry(_))
    }

    /// Returns whether a reference of the given scope may be used here.
    #[must_use]
    pub const fn admits(&self, scope: RefScope) -> bool {
        match self {
            Self::Repository(_) => matches!(scope, RefScope::Global),
            Self::Registry(_) => matches!(scope, RefScope::Local),
        }
    }
}
