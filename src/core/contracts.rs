//! Contract document roles and the ordered set a plugin is held to.
//!
//! A contract is addressed only by role. The role fixes both the file name
//! under the ideas directory and the key used in persisted checksum maps
//! (`creative-brief.md` <-> `creative_brief`).

use crate::core::error::GuardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractRole {
    CreativeBrief,
    ParameterSpec,
    Architecture,
    Plan,
}

impl ContractRole {
    pub const ALL: [ContractRole; 4] = [
        ContractRole::CreativeBrief,
        ContractRole::ParameterSpec,
        ContractRole::Architecture,
        ContractRole::Plan,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::CreativeBrief => "creative-brief.md",
            Self::ParameterSpec => "parameter-spec.md",
            Self::Architecture => "architecture.md",
            Self::Plan => "plan.md",
        }
    }

    /// Key used in `contract_checksums` maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::CreativeBrief => "creative_brief",
            Self::ParameterSpec => "parameter_spec",
            Self::Architecture => "architecture",
            Self::Plan => "plan",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.file_name() == name)
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for ContractRole {
    type Err = GuardError;

    /// Accepts the checksum key (`parameter_spec`), the file name
    /// (`parameter-spec.md`) or the bare stem (`parameter-spec`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(role) = Self::from_key(trimmed).or_else(|| Self::from_file_name(trimmed)) {
            return Ok(role);
        }
        let normalized = trimmed.trim_end_matches(".md").replace('-', "_");
        Self::from_key(&normalized).ok_or_else(|| {
            GuardError::InvalidInput(format!(
                "'{}' is not a contract role (expected one of: {})",
                s,
                Self::ALL.map(|r| r.key()).join(", ")
            ))
        })
    }
}

/// The ordered list of contract roles a plugin's ideas directory is held to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSet {
    ideas_dir: PathBuf,
    roles: Vec<ContractRole>,
}

impl ContractSet {
    pub fn new(ideas_dir: impl Into<PathBuf>, roles: Vec<ContractRole>) -> Self {
        let mut ordered: Vec<ContractRole> = Vec::with_capacity(roles.len());
        for role in roles {
            if !ordered.contains(&role) {
                ordered.push(role);
            }
        }
        Self {
            ideas_dir: ideas_dir.into(),
            roles: ordered,
        }
    }

    pub fn ideas_dir(&self) -> &Path {
        &self.ideas_dir
    }

    pub fn roles(&self) -> &[ContractRole] {
        &self.roles
    }

    pub fn contains(&self, role: ContractRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn path(&self, role: ContractRole) -> PathBuf {
        self.ideas_dir.join(role.file_name())
    }

    /// Text of a contract document; `None` when absent or when the role is
    /// not part of this set.
    pub fn read(&self, role: ContractRole) -> Result<Option<String>, GuardError> {
        let path = self.path(role);
        if !self.contains(role) || !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }
}
