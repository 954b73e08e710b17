//! Stage marker parsing and the immutability gate.
//!
//! The marker is a markdown document with a `---` fenced preamble:
//!
//! ```text
//! ---
//! stage: 3
//! contract_checksums:
//!   creative_brief: sha256:...
//!   parameter_spec: sha256:...
//! ---
//! ```

use crate::core::checksum::ChecksumMap;
use crate::core::config::StageWindow;
use crate::core::error::GuardError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const CHECKSUMS_FIELD: &str = "contract_checksums:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageMarker {
    pub stage: Option<u32>,
    pub contract_checksums: ChecksumMap,
}

impl StageMarker {
    pub fn parse(content: &str) -> Self {
        let preamble = frontmatter(content);
        let stage = parse_stage(preamble.unwrap_or(content));
        let contract_checksums = preamble.map(parse_checksums).unwrap_or_default();
        Self {
            stage,
            contract_checksums,
        }
    }

    /// Missing marker reads as an empty marker.
    pub fn load(path: &Path) -> Result<Self, GuardError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }
}

fn frontmatter(content: &str) -> Option<&str> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;
    if rest.starts_with("---") {
        return Some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

fn parse_stage(text: &str) -> Option<u32> {
    let re = Regex::new(r"(?m)^stage:\s*(\d+)").expect("valid stage regex");
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_checksums(preamble: &str) -> ChecksumMap {
    let mut map = ChecksumMap::new();
    let mut in_checksums = false;
    for line in preamble.lines() {
        if line.trim() == CHECKSUMS_FIELD {
            in_checksums = true;
            continue;
        }
        if !in_checksums {
            continue;
        }
        // Nested entries are indented; the first unindented line closes the block.
        if !line.starts_with("  ") {
            break;
        }
        if let Some((key, value)) = line.trim().split_once(':') {
            map.insert(key.trim(), value.trim());
        }
    }
    map
}

/// Decides whether contract immutability applies to a plugin right now.
pub struct StageGate {
    marker_path: PathBuf,
    window: StageWindow,
}

impl StageGate {
    pub fn new(marker_path: impl Into<PathBuf>, window: StageWindow) -> Self {
        Self {
            marker_path: marker_path.into(),
            window,
        }
    }

    pub fn window(&self) -> StageWindow {
        self.window
    }

    pub fn marker(&self) -> Result<StageMarker, GuardError> {
        StageMarker::load(&self.marker_path)
    }

    pub fn current_stage(&self) -> Result<Option<u32>, GuardError> {
        Ok(self.marker()?.stage)
    }

    pub fn immutability_required(&self) -> Result<bool, GuardError> {
        Ok(self
            .current_stage()?
            .is_some_and(|stage| self.window.contains(stage)))
    }
}
