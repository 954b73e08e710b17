//! Facts pulled out of the contract documents themselves.

use crate::core::config::StageWindow;
use crate::extract::markdown::{self, Table};
use crate::extract::{ParamKind, ParameterDefinition};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Architecture types that are helpers, never members of the processor.
const DSP_NON_MEMBER_TYPES: [&str; 5] = [
    "ProcessSpec",
    "ProcessContextReplacing",
    "ProcessContextNonReplacing",
    "AudioBlock",
    "FastMathApproximations",
];

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Data rows of the brief's parameter tables: tables with at least four
/// columns whose header names a `Parameter` or `Range` column. `None` when
/// there are no such rows.
pub fn brief_parameter_rows(text: &str) -> Option<usize> {
    let rows: usize = markdown::tables(text)
        .iter()
        .filter(|t| t.column_count() >= 4)
        .filter(|t| {
            t.header_index(|c| c.contains("parameter") || c.contains("range"))
                .is_some()
        })
        .map(|t| t.rows.len())
        .sum();
    (rows > 0).then_some(rows)
}

/// Value of a `**Total Parameters:** N` field.
pub fn declared_total(text: &str) -> Option<usize> {
    let re = Regex::new(r"\*\*Total Parameters:\*\*\s*(\d+)").expect("valid total regex");
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parameter identifiers declared as `### UPPER_SNAKE` headings.
///
/// When level-2 sections mentioning "parameter" hold such headings, only
/// those sections count; otherwise the whole document does.
pub fn declared_identifiers(text: &str) -> BTreeSet<String> {
    let collect = |lines: &[&str]| -> BTreeSet<String> {
        let mut in_fence = false;
        let mut ids = BTreeSet::new();
        for line in lines {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if let Some((3, title)) = markdown::heading(line)
                && is_identifier(title)
            {
                ids.insert(title.to_string());
            }
        }
        ids
    };

    let scoped: BTreeSet<String> = markdown::sections(text, |level, title| {
        level == 2 && title.to_ascii_lowercase().contains("parameter")
    })
    .iter()
    .flat_map(|body| collect(body))
    .collect();

    if !scoped.is_empty() {
        return scoped;
    }
    let all: Vec<&str> = text.lines().collect();
    collect(&all)
}

/// The architecture's parameter mapping tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    /// Data rows across all mapping tables.
    pub rows: usize,
    /// Identifiers named in the identifier column.
    pub references: BTreeSet<String>,
}

/// Tables under a heading mentioning "Parameter Map". `None` when the
/// document has no such section.
pub fn mapping_table(text: &str) -> Option<MappingTable> {
    let bodies = markdown::sections(text, |_, title| {
        title.to_ascii_lowercase().contains("parameter map")
    });
    if bodies.is_empty() {
        return None;
    }

    let mut mapping = MappingTable::default();
    for body in bodies {
        for table in markdown::tables(&body.join("\n")) {
            let column = id_column(&table);
            mapping.rows += table.rows.len();
            for row in &table.rows {
                if let Some(cell) = row.get(column) {
                    let token = markdown::plain(cell);
                    if is_identifier(&token) {
                        mapping.references.insert(token);
                    }
                }
            }
        }
    }
    Some(mapping)
}

fn id_column(table: &Table) -> usize {
    table
        .header_index(|c| matches!(c, "parameter" | "parameter id" | "param" | "id"))
        .unwrap_or(0)
}

/// Component names from `- Name: ...` bullets under `## Core Components` or
/// `## DSP Components`. Only top-level bullets count.
pub fn core_components(text: &str) -> Vec<String> {
    let bodies = markdown::sections(text, |level, title| {
        let lower = title.to_ascii_lowercase();
        level == 2 && (lower.starts_with("core components") || lower.starts_with("dsp components"))
    });

    let mut out: Vec<String> = Vec::new();
    for body in bodies {
        for line in body {
            if markdown::heading(line).is_some() {
                break;
            }
            let Some(item) = line.strip_prefix("- ") else {
                continue;
            };
            let name = item
                .split([':', '—', '–'])
                .next()
                .unwrap_or("")
                .split(" - ")
                .next()
                .unwrap_or("");
            let name = markdown::plain(name);
            if !name.is_empty() && !out.contains(&name) {
                out.push(name);
            }
        }
    }
    out
}

/// Plan text from the first `Stage <start>:` marker up to the first later
/// `Stage <n>:` marker with `n` outside `window`.
pub fn stage_excerpt(text: &str, window: StageWindow) -> Option<&str> {
    let re = Regex::new(r"Stage (\d+):").expect("valid stage marker regex");
    let markers: Vec<(usize, u32)> = re
        .captures_iter(text)
        .filter_map(|c| {
            let at = c.get(0)?.start();
            let n = c.get(1)?.as_str().parse().ok()?;
            Some((at, n))
        })
        .collect();

    let start = markers.iter().find(|(_, n)| *n == window.start)?.0;
    let end = markers
        .iter()
        .find(|(at, n)| *at > start && !window.contains(*n))
        .map(|(at, _)| *at)
        .unwrap_or(text.len());
    Some(&text[start..end])
}

/// Parameter definitions from a parameter specification, from either the
/// `| id | Float | range |` table form or the `### id` section form with
/// `- **Type:**` / `- **Range:**` bullets. Section entries win on conflict.
pub fn spec_parameters(text: &str) -> BTreeMap<String, ParameterDefinition> {
    let mut params = BTreeMap::new();

    let row_re = Regex::new(r"\|\s*(\w+)\s*\|\s*(Float|Bool|Choice)\s*\|(?:\s*([^|\n]*?)\s*\|)?")
        .expect("valid parameter row regex");
    for c in row_re.captures_iter(text) {
        let Some(kind) = ParamKind::from_token(&c[2]) else {
            continue;
        };
        let range = c
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|r| !r.is_empty() && !r.chars().all(|ch| ch == '-'));
        params.insert(
            c[1].to_string(),
            ParameterDefinition {
                id: c[1].to_string(),
                kind,
                range,
            },
        );
    }

    let section_re = Regex::new(r"^###\s+(\w+)\s*$").expect("valid section regex");
    let type_re = Regex::new(r"^\s*-\s*\*\*Type:\*\*\s*(Float|Bool|Choice)").expect("valid type regex");
    let range_re = Regex::new(r"^\s*-\s*\*\*Range:\*\*\s*(.+?)\s*$").expect("valid range regex");

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let Some(head) = section_re.captures(line) else {
            continue;
        };
        let id = head[1].to_string();
        let mut kind = None;
        let mut range = None;
        for next in lines.iter().skip(i + 1).take(9) {
            if next.starts_with('#') {
                break;
            }
            if let Some(t) = type_re.captures(next) {
                kind = kind.or(ParamKind::from_token(&t[1]));
            }
            if let Some(r) = range_re.captures(next) {
                range = range.or(Some(r[1].to_string()));
            }
        }
        if let Some(kind) = kind {
            params.insert(id.clone(), ParameterDefinition { id, kind, range });
        }
    }

    params
}

/// Component paths referenced as `juce::dsp::Name` (nested names such as
/// `IIR::Filter` kept whole), excluding helper types.
pub fn dsp_component_references(text: &str) -> BTreeSet<String> {
    let re = Regex::new(r"juce::dsp::(\w+(?:::\w+)*)").expect("valid dsp regex");
    re.captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|name| {
            let head = name.split("::").next().unwrap_or(name);
            !DSP_NON_MEMBER_TYPES.contains(&head)
        })
        .collect()
}
