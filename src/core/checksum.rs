//! Content digests of contract documents.
//!
//! The store computes and compares digests; it never persists them. The
//! stage marker document is the persistence boundary.

use crate::core::contracts::{ContractRole, ContractSet};
use crate::core::error::GuardError;
use crate::core::report::{Finding, Subject, ValidationResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs;
use std::str::FromStr;

pub const DIGEST_ALGORITHM: &str = "sha256";

/// A SHA-256 digest rendered as `sha256:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    hex: String,
}

impl Digest {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            hex: format!("{:x}", hasher.finalize()),
        }
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", DIGEST_ALGORITHM, self.hex)
    }
}

impl FromStr for Digest {
    type Err = GuardError;

    /// Accepts `sha256:<hex>` or a bare 64-character hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let hex = match raw.split_once(':') {
            Some((algo, hex)) if algo.eq_ignore_ascii_case(DIGEST_ALGORITHM) => hex,
            Some((algo, _)) => {
                return Err(GuardError::InvalidInput(format!(
                    "unsupported digest algorithm '{}'",
                    algo
                )));
            }
            None => raw,
        };
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GuardError::InvalidInput(format!(
                "malformed digest '{}'",
                raw
            )));
        }
        Ok(Self {
            hex: hex.to_ascii_lowercase(),
        })
    }
}

/// Role key -> digest string, in insertion order.
///
/// Keys stay as strings: a persisted map may carry keys that are no longer
/// contract roles, and those must be reported rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumMap {
    entries: Vec<(String, String)>,
}

impl ChecksumMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, digest: impl Into<String>) {
        let key = key.into();
        let digest = digest.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = digest,
            None => self.entries.push((key, digest)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl Serialize for ChecksumMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChecksumMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ChecksumMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of contract keys to digest strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = ChecksumMap::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    out.insert(k, v);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

pub struct ChecksumStore<'a> {
    contracts: &'a ContractSet,
}

impl<'a> ChecksumStore<'a> {
    pub fn new(contracts: &'a ContractSet) -> Self {
        Self { contracts }
    }

    /// Digest of the exact bytes of a contract; `None` when the document is absent.
    pub fn digest(&self, role: ContractRole) -> Result<Option<Digest>, GuardError> {
        let path = self.contracts.path(role);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(Digest::of_bytes(&bytes)))
    }

    /// Digests of every present contract in the set; absent ones are left out.
    pub fn digest_all(&self) -> Result<ChecksumMap, GuardError> {
        let mut map = ChecksumMap::new();
        for role in self.contracts.roles() {
            if let Some(digest) = self.digest(*role)? {
                map.insert(role.key(), digest.to_string());
            }
        }
        Ok(map)
    }

    /// Compare stored digests with the current documents, one result per
    /// stored entry in the stored map's order. Entries for roles outside the
    /// set are passed over.
    pub fn verify(&self, stored: &ChecksumMap) -> Result<Vec<ValidationResult>, GuardError> {
        let current = self.digest_all()?;
        let mut results = Vec::with_capacity(stored.len());

        for (key, stored_digest) in stored.iter() {
            let (subject, file_name) = match ContractRole::from_key(key) {
                Some(role) if !self.contracts.contains(role) => continue,
                Some(role) => (Subject::Contract(role), role.file_name().to_string()),
                None => {
                    let file_name = format!("{}.md", key.replace('_', "-"));
                    (Subject::Document(file_name.clone()), file_name)
                }
            };

            let Some(current_digest) = current.get(key) else {
                results.push(ValidationResult::error(
                    Finding::MissingDocument,
                    subject,
                    format!("Contract file {} is missing", file_name),
                ));
                continue;
            };

            let matches = stored_digest
                .parse::<Digest>()
                .map(|d| d.to_string() == current_digest)
                .unwrap_or(false);

            if matches {
                results.push(ValidationResult::verified(
                    subject,
                    format!("Contract {} verified", file_name),
                ));
            } else {
                results.push(ValidationResult::error(
                    Finding::ChecksumMismatch,
                    subject,
                    format!(
                        "Contract {} has been modified (checksum mismatch)",
                        file_name
                    ),
                ));
            }
        }

        Ok(results)
    }
}
