// crates/varlock-core/src/runtime/report.rs
// ============================================================================
// Module: Varlock Diagnostic Report
// Description: Human-readable rendering of dependencies and models.
// Purpose: Produce plain-text diagnostics (name, depender, slots, formula)
//          without any I/O.
// Dependencies: crate::runtime::{dependency, model}, std::fmt
// ============================================================================

//! ## Overview
//! Report rendering is purely diagnostic: it lists the declared dependees,
//! each realized dependency with its rendered canonical formula, and the
//! reverse index. The output is stable text suitable for logs and debugging
//! sessions; it is not a serialization format.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use crate::runtime::dependency::Dependency;
use crate::runtime::model::DependencyModel;

// ============================================================================
// SECTION: Dependency Rendering
// ============================================================================

impl<R> Dependency<R> {
    /// Writes a one-entry description of this dependency.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors from the underlying writer.
    pub fn describe<W: Write>(&self, out: &mut W, indent: &str) -> fmt::Result {
        writeln!(out, "{indent}depender: `{}`", self.depender())?;
        writeln!(
            out,
            "{indent}scope: {}",
            if self.is_local() { "registry" } else { "repository" }
        )?;
        if self.slots().is_empty() {
            writeln!(out, "{indent}dependees: <none>")?;
        } else {
            writeln!(out, "{indent}dependees: [{}]", self.slots().len())?;
            for (slot, dependee) in self.slots().iter() {
                writeln!(out, "{indent}  slot [{slot}] = `{dependee}`")?;
            }
        }
        match self.logic() {
            Some(logic) => writeln!(out, "{indent}logic: {logic}")?,
            None => writeln!(out, "{indent}logic: <none>")?,
        }
        writeln!(out, "{indent}locked: {}", if self.is_locked() { "yes" } else { "no" })?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Model Rendering
// ============================================================================

impl<R> DependencyModel<R> {
    /// Renders a full plain-text report of the model.
    #[must_use]
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        // Writes into a String cannot fail; never surface half a report.
        if self.render_into(&mut out).is_err() {
            out.clear();
        }
        out
    }

    /// Writes the report body into the given writer.
    fn render_into<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(
            out,
            "dependency model ({} scope, {})",
            if self.is_local() { "registry" } else { "repository" },
            if self.is_initialized() { "initialized" } else { "not initialized" }
        )?;

        if self.dependee_records().is_empty() {
            writeln!(out, "dependees: <none>")?;
        } else {
            writeln!(out, "dependees: [{}]", self.dependee_records().len())?;
            for (slot, path) in self.dependee_records() {
                writeln!(out, "  slot [{slot}] = `{path}`")?;
            }
        }

        if self.dependency_records().is_empty() {
            writeln!(out, "dependencies: <none>")?;
        } else {
            writeln!(out, "dependencies: [{}]", self.dependency_records().len())?;
            for (name, record) in self.dependency_records() {
                writeln!(out, "  dependency `{name}`:")?;
                match self.get_dependency(&record.depender_path) {
                    Some(dependency) => dependency.describe(out, "    ")?,
                    None => writeln!(out, "    depender: `{}`", record.depender_path)?,
                }
            }
        }

        if self.dependers_per_dependee().is_empty() {
            writeln!(out, "dependers per dependee: <none>")?;
        } else {
            writeln!(out, "dependers per dependee: [{}]", self.dependers_per_dependee().len())?;
            for (dependee, dependers) in self.dependers_per_dependee() {
                write!(out, "  `{dependee}` <- ")?;
                for (index, depender) in dependers.iter().enumerate() {
                    if index > 0 {
                        write!(out, ", ")?;
                    }
                    write!(out, "`{depender}`")?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
