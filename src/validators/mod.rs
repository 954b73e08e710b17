//! Validation entry points.
//!
//! One module per entry point. Each reads the documents and sources it
//! needs for a single plugin, runs the relevant reconciliation rules in a
//! fixed order, and returns a [`Report`]. A check that fails never stops
//! the checks after it.

pub mod checksums;
pub mod cross_contract;
pub mod dsp;
pub mod foundation;
pub mod gui;
pub mod parameters;

use crate::core::config::GuardConfig;
use crate::core::contracts::ContractSet;
use crate::core::error::GuardError;
use crate::core::output;
use crate::core::report::{Outcome, Report};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PROCESSOR_HEADER: &str = "Source/PluginProcessor.h";
pub const PROCESSOR_SOURCE: &str = "Source/PluginProcessor.cpp";
pub const EDITOR_HEADER: &str = "Source/PluginEditor.h";
pub const EDITOR_SOURCE: &str = "Source/PluginEditor.cpp";
pub const UI_INDEX: &str = "ui/public/index.html";
pub const UI_SCRIPTS_DIR: &str = "ui/public/js";
pub const BUILD_MANIFEST: &str = "CMakeLists.txt";

/// The plugin directory under validation plus the configuration in force.
#[derive(Debug, Clone)]
pub struct PluginContext<'a> {
    pub dir: PathBuf,
    pub config: &'a GuardConfig,
}

impl<'a> PluginContext<'a> {
    pub fn new(dir: impl Into<PathBuf>, config: &'a GuardConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    pub fn contracts(&self) -> ContractSet {
        self.config.contract_set(&self.dir)
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.join(rel)
    }

    /// Contents of a plugin-relative file; `None` when it does not exist.
    pub fn read_optional(&self, rel: &str) -> Result<Option<String>, GuardError> {
        read_optional(&self.path(rel))
    }

    /// Opening note naming the plugin, as every entry point prints it.
    pub fn banner(&self, what: &str) -> String {
        format!(
            "validating {} for {}",
            what,
            crate::core::workspace::plugin_name(&self.dir)
        )
    }
}

pub fn read_optional(path: &Path) -> Result<Option<String>, GuardError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(GuardError::IoError(err)),
    }
}

/// Trace, evaluate and record one named check.
pub(crate) fn run_check(
    report: &mut Report,
    name: &str,
    check: impl FnOnce() -> Result<Outcome, GuardError>,
) -> Result<(), GuardError> {
    output::trace_check(name);
    let outcome = check()?;
    report.record(name, outcome);
    Ok(())
}
