//! Validation results and run aggregation.
//!
//! Every check produces an [`Outcome`]: either it was skipped because one
//! side of the comparison is absent, or it was evaluated and produced one or
//! more immutable [`ValidationResult`]s. A [`Report`] collects outcomes in
//! evaluation order and derives the terminal [`RunStatus`].

use crate::core::contracts::ContractRole;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What a result says about the artifacts it compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    Verified,
    MissingDocument,
    ChecksumMismatch,
    CountMismatch,
    UnresolvedReference,
    MissingCoverage,
    MissingDeclaration,
    UndeclaredExtra,
    TypeMismatch,
    OrderingViolation,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verified => "verified",
            Self::MissingDocument => "missing document",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::CountMismatch => "count mismatch",
            Self::UnresolvedReference => "unresolved reference",
            Self::MissingCoverage => "missing coverage",
            Self::MissingDeclaration => "missing declaration",
            Self::UndeclaredExtra => "undeclared extra",
            Self::TypeMismatch => "type mismatch",
            Self::OrderingViolation => "ordering violation",
        };
        f.write_str(name)
    }
}

/// The document or artifact a result concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Subject {
    Contract(ContractRole),
    /// A file that is not a known contract role (e.g. a stale checksum key).
    Document(String),
    CrossContract,
    Artifact(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract(role) => write!(f, "{}", role),
            Self::Document(name) | Self::Artifact(name) => f.write_str(name),
            Self::CrossContract => f.write_str("cross-contract"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub severity: Severity,
    pub finding: Finding,
    pub message: String,
    pub subject: Subject,
}

impl ValidationResult {
    pub fn verified(subject: Subject, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            severity: Severity::Info,
            finding: Finding::Verified,
            message: message.into(),
            subject,
        }
    }

    pub fn error(finding: Finding, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            severity: Severity::Error,
            finding,
            message: message.into(),
            subject,
        }
    }

    pub fn warning(finding: Finding, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            severity: Severity::Warning,
            finding,
            message: message.into(),
            subject,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.passed && self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        !self.passed && self.severity == Severity::Warning
    }
}

/// Result of evaluating one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to compare; not a pass and not a failure.
    Skipped(String),
    Checked(Vec<ValidationResult>),
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    pub fn single(result: ValidationResult) -> Self {
        Self::Checked(vec![result])
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn results(&self) -> &[ValidationResult] {
        match self {
            Self::Skipped(_) => &[],
            Self::Checked(results) => results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCheck {
    pub check: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No check had anything to evaluate.
    NothingToCheck,
    Passed,
    PassedWithWarnings,
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::NothingToCheck | Self::Passed => 0,
            Self::Failed => 1,
            Self::PassedWithWarnings => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NothingToCheck => "nothing_to_check",
            Self::Passed => "passed",
            Self::PassedWithWarnings => "passed_with_warnings",
            Self::Failed => "failed",
        }
    }
}

/// Ordered collection of everything one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub results: Vec<ValidationResult>,
    pub skipped: Vec<SkippedCheck>,
    /// Free-form context lines (e.g. which plugin was validated).
    pub notes: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: &str, outcome: Outcome) {
        match outcome {
            Outcome::Skipped(reason) => self.skipped.push(SkippedCheck {
                check: check.to_string(),
                reason,
            }),
            Outcome::Checked(results) => self.results.extend(results),
        }
    }

    pub fn push(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    pub fn merge(&mut self, other: Report) {
        self.results.extend(other.results);
        self.skipped.extend(other.skipped);
        self.notes.extend(other.notes);
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_warning())
    }

    pub fn passes(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.passed)
    }

    /// Worst severity among failed results, if any failed.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.severity)
            .max()
    }

    pub fn status(&self) -> RunStatus {
        if self.results.is_empty() {
            return RunStatus::NothingToCheck;
        }
        match self.worst_severity() {
            Some(Severity::Error) => RunStatus::Failed,
            Some(Severity::Warning) => RunStatus::PassedWithWarnings,
            _ => RunStatus::Passed,
        }
    }
}
