// crates/varlock-config/src/config.rs
// ============================================================================
// Module: Varlock Configuration
// Description: Configuration loading and validation for dependency models.
// Purpose: Provide strict, fail-closed TOML parsing of dependee and
//          dependency records with hard limits.
// Dependencies: varlock-core, serde, toml
// ============================================================================

//! ## Overview
//! Dependency model descriptions are loaded from TOML with strict size and
//! cardinality limits and unknown-field rejection. The loader is one concrete
//! realization of the record boundary the core engine defines; the engine
//! itself stays agnostic to serialization. Missing or invalid configuration
//! fails closed: nothing is handed to the model until the whole document
//! validates.
//!
//! ### Example document
//!
//! ```toml
//! [[dependees]]
//! slot = 0
//! variant = "geometry:has_detector_0/if_detector"
//!
//! [[dependencies]]
//! name = "detector_pair"
//! depender = "analysis:pairing/if_active"
//! slots = [0]
//! logic = "[0]"
//! logging = "debug"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use varlock_core::DependeeRecord;
use varlock_core::DependencyRecord;
use varlock_core::ModelSpec;
use varlock_core::Verbosity;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of dependee entries.
pub(crate) const MAX_DEPENDEES: usize = 4096;
/// Maximum number of dependency entries.
pub(crate) const MAX_DEPENDENCIES: usize = 4096;
/// Maximum length of a single object path.
pub(crate) const MAX_PATH_LENGTH: usize = 1024;
/// Maximum length of a logic formula.
pub(crate) const MAX_FORMULA_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Dependency model configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Declared dependee slot bindings.
    #[serde(default)]
    pub dependees: Vec<DependeeEntry>,
    /// Declared dependency entries.
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
    /// Default diagnostic verbosity for entries that do not set one.
    #[serde(default)]
    pub logging: Option<Verbosity>,
}

/// One dependee slot binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependeeEntry {
    /// Model-wide slot index.
    pub slot: u32,
    /// Dependee variant path.
    pub variant: String,
}

/// One dependency declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyEntry {
    /// Unique dependency name.
    pub name: String,
    /// Depender object path.
    pub depender: String,
    /// Dependee slots feeding this dependency.
    pub slots: Vec<u32>,
    /// Optional logic formula; the default logic is synthesized when absent.
    #[serde(default)]
    pub logic: Option<String>,
    /// Optional per-dependency diagnostic verbosity.
    #[serde(default)]
    pub logging: Option<Verbosity>,
}

impl ModelConfig {
    /// Loads a configuration document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses a configuration document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the document against the configured limits.
    ///
    /// Structural semantics (slot subsets, duplicate names, formula syntax)
    /// are enforced by the model at initialization; this pass rejects only
    /// what should never reach the engine at all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a limit is exceeded or a field
    /// is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dependees.len() > MAX_DEPENDEES {
            return Err(ConfigError::Invalid(format!(
                "too many dependee entries (max {MAX_DEPENDEES})"
            )));
        }
        if self.dependencies.len() > MAX_DEPENDENCIES {
            return Err(ConfigError::Invalid(format!(
                "too many dependency entries (max {MAX_DEPENDENCIES})"
            )));
        }
        for entry in &self.dependees {
            if entry.variant.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "dependee slot [{}] has an empty variant path",
                    entry.slot
                )));
            }
            if entry.variant.len() > MAX_PATH_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "dependee slot [{}] path exceeds {MAX_PATH_LENGTH} bytes",
                    entry.slot
                )));
            }
        }
        for entry in &self.dependencies {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid("dependency entry has an empty name".to_string()));
            }
            if entry.depender.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "dependency `{}` has an empty depender path",
                    entry.name
                )));
            }
            if entry.depender.len() > MAX_PATH_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "dependency `{}` depender path exceeds {MAX_PATH_LENGTH} bytes",
                    entry.name
                )));
            }
            if entry.slots.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "dependency `{}` declares no slots",
                    entry.name
                )));
            }
            if let Some(logic) = &entry.logic {
                if logic.len() > MAX_FORMULA_LENGTH {
                    return Err(ConfigError::Invalid(format!(
                        "dependency `{}` formula exceeds {MAX_FORMULA_LENGTH} bytes",
                        entry.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Converts the validated document into the record set consumed by
    /// `DependencyModel::initialize`.
    #[must_use]
    pub fn into_spec(self) -> ModelSpec {
        let default_logging = self.logging.unwrap_or_default();
        ModelSpec {
            dependees: self
                .dependees
                .into_iter()
                .map(|entry| DependeeRecord {
                    slot: entry.slot,
                    path: entry.variant,
                })
                .collect(),
            dependencies: self
                .dependencies
                .into_iter()
                .map(|entry| DependencyRecord {
                    name: entry.name,
                    depender_path: entry.depender,
                    input_slots: entry.slots.into_iter().collect::<BTreeSet<u32>>(),
                    logic_expression: entry.logic,
                    logging: entry.logging.unwrap_or(default_logging),
                })
                .collect(),
        }
    }
}
