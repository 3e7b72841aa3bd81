// crates/varlock-core/src/runtime/model.rs
// ============================================================================
// Module: Varlock Dependency Model
// Description: Aggregate of named dependencies with a reverse dependee index.
// Purpose: Realize dependency records into locked dependencies atomically and
//          answer depender/dependee queries.
// Dependencies: crate::{core, interfaces, runtime::dependency}, slot-logic,
//               serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The dependency model owns the declared record dictionaries and the
//! dependencies realized from them. Initialization is atomic: records are
//! validated and realized into local collections, and nothing is committed
//! until every dependency has been locked — a failure anywhere leaves the
//! model in its pre-initialize state. After realization the model derives a
//! reverse index answering "which dependers are affected by this dependee",
//! rebuilt on every initialization rather than maintained as live pointers.

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
use crate::core::object_ref::ObjectRefError;
use crate::interfaces::ActivationResolver;
use crate::interfaces::Scope;
use crate::runtime::dependency::Dependency;
use crate::runtime::dependency::DependencyError;
use crate::runtime::dependency::Verbosity;

// ============================================================================
// SECTION: Configuration Records
// ============================================================================

/// Declared binding of a model-wide slot to a dependee path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependeeRecord {
    /// Model-wide slot index.
    pub slot: SlotIndex,
    /// Dependee object path.
    pub path: String,
}

/// Declared dependency: a named depender conditioned on declared slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Unique record name.
    pub name: String,
    /// Depender object path.
    pub depender_path: String,
    /// Declared slots feeding this dependency.
    pub input_slots: BTreeSet<SlotIndex>,
    /// Optional logic formula; when absent the default logic is synthesized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_expression: Option<String>,
    /// Diagnostic verbosity for the realized dependency.
    #[serde(default)]
    pub logging: Verbosity,
}

/// Complete configuration description consumed by [`DependencyModel::initialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Declared dependee slot bindings.
    pub dependees: Vec<DependeeRecord>,
    /// Declared dependency records.
    pub dependencies: Vec<DependencyRecord>,
}

// ============================================================================
// SECTION: Model Errors
// ============================================================================

/// Errors raised while initializing or querying a dependency model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model is already initialized.
    #[error("dependency model is already initialized")]
    AlreadyInitialized,
    /// The model is not initialized.
    #[error("dependency model is not initialized")]
    NotInitialized,
    /// A dependee slot was declared more than once.
    #[error("dependee slot [{slot}] is declared more than once")]
    DuplicateDependeeSlot {
        /// The colliding slot index.
        slot: SlotIndex,
    },
    /// A dependee path was declared more than once.
    #[error("dependee path `{path}` is declared more than once")]
    DuplicateDependeePath {
        /// The colliding path.
        path: String,
    },
    /// A dependency record name was declared more than once.
    #[error("dependency record `{name}` is declared more than once")]
    DuplicateDependencyName {
        /// The colliding record name.
        name: String,
    },
    /// A dependency record has an empty name.
    #[error("dependency record has an empty name")]
    EmptyDependencyName,
    /// Two dependency records target the same depender path.
    #[error("a dependency already targets depender `{path}`")]
    DuplicateDepender {
        /// The depender path targeted twice.
        path: String,
    },
    /// A dependency record declares no input slots.
    #[error("dependency record `{name}` declares no input slots")]
    EmptyInputSlots {
        /// The offending record name.
        name: String,
    },
    /// A dependency record references a slot absent from the dependee records.
    #[error("dependency record `{name}` references undeclared dependee slot [{slot}]")]
    UnknownDependeeSlot {
        /// The offending record name.
        name: String,
        /// The undeclared slot index.
        slot: SlotIndex,
    },
    /// No dependency targets the queried depender path.
    #[error("no dependency targets depender `{path}`")]
    UnknownDepender {
        /// The queried depender path.
        path: String,
    },
    /// A record failed to realize into a locked dependency.
    #[error("dependency record `{name}` failed to realize: {source}")]
    Record {
        /// The offending record name.
        name: String,
        /// The underlying dependency failure.
        source: DependencyError,
    },
    /// Evaluation of a realized dependency failed.
    #[error("evaluation of depender `{path}` failed: {source}")]
    Evaluation {
        /// The depender path being evaluated.
        path: String,
        /// The underlying dependency failure.
        source: DependencyError,
    },
    /// Malformed object reference in a record.
    #[error(transparent)]
    Reference(#[from] ObjectRefError),
}

// ============================================================================
// SECTION: Dependency Model
// ============================================================================

/// Aggregate owning the dependencies of one repository or one registry.
///
/// # Invariants
/// - When initialized, every realized dependency is locked and the realized
///   count equals the dependency-record count.
/// - At most one dependency targets a given depender path.
#[derive(Debug, Clone)]
pub struct DependencyModel<R> {
    /// Binding to the repository or registry that resolves activation.
    scope: Scope<R>,
    /// Model-level diagnostic verbosity threshold.
    verbosity: Verbosity,
    /// Declared dependee paths keyed by model-wide slot.
    dependee_records: BTreeMap<SlotIndex, String>,
    /// Declared dependency records keyed by name.
    dependency_records: BTreeMap<String, DependencyRecord>,
    /// Realized dependencies keyed by depender path.
    dependencies: BTreeMap<String, Dependency<R>>,
    /// Reverse index: dependee path to the depender paths it affects.
    dependers: BTreeMap<String, BTreeSet<String>>,
    /// Whether `initialize` has completed.
    initialized: bool,
}

impl<R: ActivationResolver + Clone> DependencyModel<R> {
    /// Creates an empty model bound to a repository or registry.
    #[must_use]
    pub const fn new(scope: Scope<R>) -> Self {
        Self {
            scope,
            verbosity: Verbosity::Warn,
            dependee_records: BTreeMap::new(),
            dependency_records: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            dependers: BTreeMap::new(),
            initialized: false,
        }
    }

    /// Initializes the model from a configuration description.
    ///
    /// Records are validated first, then realized into locked dependencies,
    /// then the reverse index is derived; nothing is committed until all
    /// three passes succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] for record-level violations and realization
    /// failures; the model stays in its pre-initialize state on any failure.
    pub fn initialize(&mut self, spec: ModelSpec) -> Result<(), ModelError> {
        if self.initialized {
            return Err(ModelError::AlreadyInitialized);
        }

        let dependee_records = Self::validate_dependee_records(&spec)?;
        let dependency_records = Self::validate_dependency_records(&spec, &dependee_records)?;

        let mut dependencies: BTreeMap<String, Dependency<R>> = BTreeMap::new();
        for (name, record) in &dependency_records {
            let dependency = self.realize(name, record, &dependee_records)?;
            dependencies.insert(record.depender_path.clone(), dependency);
        }

        let mut dependers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (depender_path, dependency) in &dependencies {
            for (_, dependee) in dependency.slots().iter() {
                dependers
                    .entry(dependee.path().to_string())
                    .or_default()
                    .insert(depender_path.clone());
            }
        }

        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(
                dependencies = dependencies.len(),
                dependees = dependee_records.len(),
                local = self.scope.is_local(),
                "dependency model initialized"
            );
        }

        self.dependee_records = dependee_records;
        self.dependency_records = dependency_records;
        self.dependencies = dependencies;
        self.dependers = dependers;
        self.initialized = true;
        Ok(())
    }

    /// Validates the declared dependee records into the slot dictionary.
    fn validate_dependee_records(
        spec: &ModelSpec,
    ) -> Result<BTreeMap<SlotIndex, String>, ModelError> {
        let mut dependee_records: BTreeMap<SlotIndex, String> = BTreeMap::new();
        for record in &spec.dependees {
            ObjectRef::parse(&record.path)?;
            if dependee_records.contains_key(&record.slot) {
                return Err(ModelError::DuplicateDependeeSlot {
                    slot: record.slot,
                });
            }
            if dependee_records.values().any(|path| path == &record.path) {
                return Err(ModelError::DuplicateDependeePath {
                    path: record.path.clone(),
                });
            }
            dependee_records.insert(record.slot, record.path.clone());
        }
        Ok(dependee_records)
    }

    /// Validates the declared dependency records into the name dictionary.
    fn validate_dependency_records(
        spec: &ModelSpec,
        dependee_records: &BTreeMap<SlotIndex, String>,
    ) -> Result<BTreeMap<String, DependencyRecord>, ModelError> {
        let mut dependency_records: BTreeMap<String, DependencyRecord> = BTreeMap::new();
        for record in &spec.dependencies {
            if record.name.is_empty() {
                return Err(ModelError::EmptyDependencyName);
            }
            if dependency_records.contains_key(&record.name) {
                return Err(ModelError::DuplicateDependencyName {
                    name: record.name.clone(),
                });
            }
            ObjectRef::parse(&record.depender_path)?;
            if dependency_records
                .values()
                .any(|existing| existing.depender_path == record.depender_path)
            {
                return Err(ModelError::DuplicateDepender {
                    path: record.depender_path.clone(),
                });
            }
            if record.input_slots.is_empty() {
                return Err(ModelError::EmptyInputSlots {
                    name: record.name.clone(),
                });
            }
            for slot in &record.input_slots {
                if !dependee_records.contains_key(slot) {
                    return Err(ModelError::UnknownDependeeSlot {
                        name: record.name.clone(),
                        slot: *slot,
                    });
                }
            }
            dependency_records.insert(record.name.clone(), record.clone());
        }
        Ok(dependency_records)
    }

    /// Realizes one record into a locked dependency.
    fn realize(
        &self,
        name: &str,
        record: &DependencyRecord,
        dependee_records: &BTreeMap<SlotIndex, String>,
    ) -> Result<Dependency<R>, ModelError> {
        let in_record = |source: DependencyError| ModelError::Record {
            name: name.to_string(),
            source,
        };

        let depender = ObjectRef::parse(&record.depender_path)?;
        let mut dependency =
            Dependency::new(depender, self.scope.clone()).map_err(in_record)?;
        dependency.set_verbosity(record.logging);

        for slot in &record.input_slots {
            let path = dependee_records.get(slot).ok_or(ModelError::UnknownDependeeSlot {
                name: name.to_string(),
                slot: *slot,
            })?;
            let dependee = ObjectRef::parse(path)?;
            dependency.add_dependee(dependee, Some(*slot)).map_err(in_record)?;
        }

        if let Some(expression) = record.logic_expression.as_deref() {
            if !expression.is_empty() {
                dependency.build_logic_from_formula(expression).map_err(in_record)?;
            }
        }
        dependency.lock().map_err(in_record)?;
        Ok(dependency)
    }

    /// Clears the model back to its unconstructed state.
    ///
    /// Legal from any state, including after a failed `initialize`.
    pub fn reset(&mut self) {
        self.dependers.clear();
        self.dependencies.clear();
        self.dependency_records.clear();
        self.dependee_records.clear();
        self.initialized = false;
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!("dependency model reset");
        }
    }

    /// Evaluates whether the depender at `depender_path` is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotInitialized`] before initialization,
    /// [`ModelError::UnknownDepender`] for an untargeted path, and
    /// [`ModelError::Evaluation`] when the underlying dependency fails.
    pub fn evaluate(&self, depender_path: &str) -> Result<bool, ModelError> {
        if !self.initialized {
            return Err(ModelError::NotInitialized);
        }
        let dependency =
            self.dependencies.get(depender_path).ok_or_else(|| ModelError::UnknownDepender {
                path: depender_path.to_string(),
            })?;
        dependency.evaluate().map_err(|source| ModelError::Evaluation {
            path: depender_path.to_string(),
            source,
        })
    }

    /// Returns whether the depender at `depender_path` is currently enabled,
    /// treating every failure as not fulfilled.
    #[must_use]
    pub fn is_dependency_fulfilled(&self, depender_path: &str) -> bool {
        match self.evaluate(depender_path) {
            Ok(enabled) => enabled,
            Err(error) => {
                if self.verbosity >= Verbosity::Debug {
                    tracing::debug!(
                        depender = depender_path,
                        %error,
                        "dependency treated as unfulfilled"
                    );
                }
                false
            }
        }
    }
}

impl<R> DependencyModel<R> {
    /// Returns whether the model is bound to a single registry.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.scope.is_local()
    }

    /// Returns whether `initialize` has completed.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the model-level diagnostic verbosity threshold.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Sets the model-level diagnostic verbosity threshold.
    pub const fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Returns the declared dependee paths keyed by slot.
    #[must_use]
    pub const fn dependee_records(&self) -> &BTreeMap<SlotIndex, String> {
        &self.dependee_records
    }

    /// Returns the declared dependency records keyed by name.
    #[must_use]
    pub const fn dependency_records(&self) -> &BTreeMap<String, DependencyRecord> {
        &self.dependency_records
    }

    /// Returns the realized dependencies keyed by depender path.
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeMap<String, Dependency<R>> {
        &self.dependencies
    }

    /// Returns whether a dependency targets the given depender path.
    #[must_use]
    pub fn has_dependency(&self, depender_path: &str) -> bool {
        self.dependencies.contains_key(depender_path)
    }

    /// Returns the dependency targeting the given depender path.
    #[must_use]
    pub fn get_dependency(&self, depender_path: &str) -> Option<&Dependency<R>> {
        self.dependencies.get(depender_path)
    }

    /// Returns the depender paths affected by the given dependee path.
    #[must_use]
    pub fn dependers_of(&self, dependee_path: &str) -> Option<&BTreeSet<String>> {
        self.dependers.get(dependee_path)
    }

    /// Returns the full reverse index, dependee path to depender paths.
    #[must_use]
    pub const fn dependers_per_dependee(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependers
    }
}
