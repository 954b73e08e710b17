//! Append-only change history kept inside contract documents.
//!
//! Entries live under a `## Evolution History` heading, newest first. The
//! document is rewritten through a sibling temp file and a rename so an
//! interrupted write leaves either the old or the new content.

use crate::core::contracts::{ContractRole, ContractSet};
use crate::core::error::GuardError;
use crate::core::time;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const HISTORY_HEADING: &str = "## Evolution History";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionEntry {
    pub timestamp: String,
    pub description: String,
}

impl EvolutionEntry {
    pub fn now(description: impl Into<String>) -> Self {
        Self {
            timestamp: time::local_timestamp(),
            description: description.into(),
        }
    }

    /// One list item; line breaks in the description are folded into spaces
    /// so the entry stays a single line.
    pub fn render(&self) -> String {
        let description = self.description.split_whitespace().collect::<Vec<_>>().join(" ");
        format!("- [{}] {}\n", self.timestamp, description)
    }
}

pub struct EvolutionLog<'a> {
    contracts: &'a ContractSet,
}

impl<'a> EvolutionLog<'a> {
    pub fn new(contracts: &'a ContractSet) -> Self {
        Self { contracts }
    }

    /// Record `entry` in the contract's history. Returns `false` (and writes
    /// nothing) when the contract document does not exist.
    pub fn append_entry(
        &self,
        role: ContractRole,
        entry: &EvolutionEntry,
    ) -> Result<bool, GuardError> {
        let path = self.contracts.path(role);
        if !path.is_file() {
            return Ok(false);
        }
        let content = fs::read_to_string(&path)?;
        let updated = insert_entry(&content, entry);
        write_atomic(&path, &updated)?;
        Ok(true)
    }

    /// Entries currently recorded for a contract, newest first.
    pub fn entries(&self, role: ContractRole) -> Result<Vec<EvolutionEntry>, GuardError> {
        Ok(self
            .contracts
            .read(role)?
            .map(|content| parse_entries(&content))
            .unwrap_or_default())
    }
}

/// Insert as the first entry under the history heading, creating the
/// section at the end of the document when it is absent.
pub fn insert_entry(content: &str, entry: &EvolutionEntry) -> String {
    let line = entry.render();
    let heading = Regex::new(r"(?m)^## Evolution History[ \t]*\r?$").expect("valid heading regex");

    let Some(found) = heading.find(content) else {
        let mut out = content.to_string();
        out.push_str("\n\n");
        out.push_str(HISTORY_HEADING);
        out.push_str("\n\n");
        out.push_str(&line);
        return out;
    };

    let mut out = String::with_capacity(content.len() + line.len() + 1);
    let mut pos = found.end();
    if content[pos..].starts_with('\n') {
        pos += 1;
    } else {
        // Heading is the last line without a newline.
        out.push_str(&content[..pos]);
        out.push('\n');
        out.push_str(&line);
        out.push_str(&content[pos..]);
        return out;
    }
    // Skip blank lines between the heading and the first entry.
    while let Some(next) = content[pos..].find('\n') {
        if content[pos..pos + next].trim().is_empty() {
            pos += next + 1;
        } else {
            break;
        }
    }

    out.push_str(&content[..pos]);
    out.push_str(&line);
    out.push_str(&content[pos..]);
    out
}

pub fn parse_entries(content: &str) -> Vec<EvolutionEntry> {
    let Some(start) = content.find(HISTORY_HEADING) else {
        return Vec::new();
    };
    let entry_re = Regex::new(r"^- \[([^\]]+)\] (.*)$").expect("valid entry regex");
    content[start + HISTORY_HEADING.len()..]
        .lines()
        .skip(1)
        .take_while(|line| !line.starts_with('#'))
        .filter_map(|line| entry_re.captures(line.trim_end()))
        .map(|c| EvolutionEntry {
            timestamp: c[1].to_string(),
            description: c[2].to_string(),
        })
        .collect()
}

fn write_atomic(path: &Path, content: &str) -> Result<(), GuardError> {
    let dir = path
        .parent()
        .ok_or_else(|| GuardError::PathError(format!("{} has no parent", path.display())))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GuardError::PathError(format!("{} has no file name", path.display())))?;
    let tmp = dir.join(format!(".{}.tmp-{}", name, std::process::id()));
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(GuardError::IoError(e));
    }
    Ok(())
}
