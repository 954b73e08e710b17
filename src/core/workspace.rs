//! Locating the plugin directory a run applies to.

use crate::core::error::GuardError;
use std::fs;
use std::path::{Path, PathBuf};

pub const PLUGIN_PATH_ENV: &str = "PLUGIN_PATH";

/// Resolves the active plugin: explicit path, then `PLUGIN_PATH`, then the
/// first directory under the plugins root (sorted by name) that holds the
/// caller's anchor file.
#[derive(Debug, Clone)]
pub struct PluginLocator {
    cwd: PathBuf,
    plugins_dir: PathBuf,
    env_path: Option<PathBuf>,
}

impl PluginLocator {
    pub fn new(cwd: impl Into<PathBuf>, plugins_dir: &str) -> Self {
        let cwd = cwd.into();
        let env_path = std::env::var(PLUGIN_PATH_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            plugins_dir: cwd.join(plugins_dir),
            cwd,
            env_path,
        }
    }

    pub fn with_env_path(mut self, env_path: Option<PathBuf>) -> Self {
        self.env_path = env_path;
        self
    }

    /// `Ok(None)` means no candidate plugin exists; callers skip the run.
    pub fn locate(&self, explicit: Option<&Path>, anchor: &Path) -> Result<Option<PathBuf>, GuardError> {
        if let Some(path) = explicit.or(self.env_path.as_deref()) {
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.cwd.join(path)
            };
            if !resolved.is_dir() {
                return Err(GuardError::PathError(format!(
                    "plugin directory not found: {}",
                    resolved.display()
                )));
            }
            return Ok(Some(resolved));
        }
        self.discover(anchor)
    }

    fn discover(&self, anchor: &Path) -> Result<Option<PathBuf>, GuardError> {
        if !self.plugins_dir.is_dir() {
            return Ok(None);
        }
        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.plugins_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                candidates.push(path);
            }
        }
        candidates.sort();
        Ok(candidates.into_iter().find(|dir| dir.join(anchor).exists()))
    }
}

pub fn plugin_name(plugin_dir: &Path) -> String {
    plugin_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("plugin")
        .to_string()
}
