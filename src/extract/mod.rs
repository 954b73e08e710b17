//! Fact extraction from contract documents and generated sources.
//!
//! Each function takes raw text and returns a typed fact collection. None of
//! them fail: an absent section yields an empty collection (or `None` for a
//! single value), and the reconciliation layer decides what that means.

pub mod contracts;
pub mod markdown;
pub mod source;
pub mod ui;

use serde::Serialize;
use std::fmt;

/// Declared parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Continuous,
    Boolean,
    Enumerated,
}

/// Spelling used in specifications and in `AudioParameter<Kind>`:
/// `Float`, `Bool`, `Choice`.
impl ParamKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Float" => Some(Self::Continuous),
            "Bool" => Some(Self::Boolean),
            "Choice" => Some(Self::Enumerated),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Continuous => "Float",
            Self::Boolean => "Bool",
            Self::Enumerated => "Choice",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDefinition {
    pub id: String,
    pub kind: ParamKind,
    pub range: Option<String>,
}
