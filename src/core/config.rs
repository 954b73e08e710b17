//! Engine configuration.
//!
//! Loaded from `contract-guard.toml` (or an explicit `--config` path) when
//! present; every field has a default so a missing file is never an error.

use crate::core::contracts::{ContractRole, ContractSet};
use crate::core::error::GuardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "contract-guard.toml";

/// Inclusive stage window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWindow {
    pub start: u32,
    pub end: u32,
}

impl StageWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, stage: u32) -> bool {
        self.range().contains(&stage)
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl std::fmt::Display for StageWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Contract roles checked, in reporting order.
    pub contracts: Vec<ContractRole>,
    /// Stages during which approved contracts must not change.
    pub immutable_stages: StageWindow,
    /// Plan stages whose text must mention every architecture component.
    pub coverage_stages: StageWindow,
    pub ideas_dir: String,
    pub marker_file: String,
    /// Directory scanned for an active plugin when no path is given.
    pub plugins_dir: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            contracts: ContractRole::ALL.to_vec(),
            immutable_stages: StageWindow::new(2, 5),
            coverage_stages: StageWindow::new(1, 2),
            ideas_dir: ".ideas".to_string(),
            marker_file: ".continue-here.md".to_string(),
            plugins_dir: "plugins".to_string(),
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> Result<(), GuardError> {
        for (name, window) in [
            ("immutable_stages", self.immutable_stages),
            ("coverage_stages", self.coverage_stages),
        ] {
            if window.start == 0 || window.start > window.end {
                return Err(GuardError::ConfigError(format!(
                    "{} must satisfy 1 <= start <= end (got {})",
                    name, window
                )));
            }
        }
        if self.contracts.is_empty() {
            return Err(GuardError::ConfigError(
                "contracts must name at least one contract role".into(),
            ));
        }
        Ok(())
    }

    pub fn ideas_path(&self, plugin_dir: &Path) -> PathBuf {
        plugin_dir.join(&self.ideas_dir)
    }

    pub fn marker_path(&self, plugin_dir: &Path) -> PathBuf {
        self.ideas_path(plugin_dir).join(&self.marker_file)
    }

    pub fn contract_set(&self, plugin_dir: &Path) -> ContractSet {
        ContractSet::new(self.ideas_path(plugin_dir), self.contracts.clone())
    }
}

/// Load configuration. An explicit path must exist; the implicit
/// `contract-guard.toml` in `cwd` is optional.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<GuardConfig, GuardError> {
    let path = match explicit {
        Some(p) => {
            if !p.is_file() {
                return Err(GuardError::ConfigError(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let implicit = cwd.join(CONFIG_FILE_NAME);
            if !implicit.is_file() {
                return Ok(GuardConfig::default());
            }
            implicit
        }
    };

    let content = fs::read_to_string(&path)?;
    let config: GuardConfig = toml::from_str(&content)
        .map_err(|e| GuardError::ConfigError(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}
