//! Reconciliation rules.
//!
//! Each rule takes facts already extracted from two or more sources and
//! returns an [`Outcome`]. Rules never read files and never fail; when one
//! side of a comparison is absent the rule reports `Outcome::Skipped`.

use crate::core::config::StageWindow;
use crate::core::contracts::ContractRole;
use crate::core::report::{Finding, Outcome, Subject, ValidationResult};
use crate::extract::ui::{DeclarationLines, EditorBindings};
use crate::extract::{ParamKind, ParameterDefinition};
use std::collections::{BTreeMap, BTreeSet};

fn listed<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn braced<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    format!("{{{}}}", listed(items))
}

/// All present counts must agree. Needs at least two sources.
pub fn count_agreement(sources: &[(&str, Option<usize>)]) -> Outcome {
    let present: Vec<(&str, usize)> = sources
        .iter()
        .filter_map(|(name, count)| count.map(|c| (*name, c)))
        .collect();
    if present.len() < 2 {
        return Outcome::skipped("fewer than two parameter counts available");
    }

    let first = present[0].1;
    if present.iter().all(|(_, c)| *c == first) {
        return Outcome::single(ValidationResult::verified(
            Subject::CrossContract,
            format!("Parameter count consistent across contracts: {first} parameters"),
        ));
    }
    let detail = present
        .iter()
        .map(|(name, c)| format!("{name}={c}"))
        .collect::<Vec<_>>()
        .join(", ");
    Outcome::single(ValidationResult::error(
        Finding::CountMismatch,
        Subject::CrossContract,
        format!("Parameter count mismatch across contracts: {detail}"),
    ))
}

/// Every referenced identifier must be declared.
pub fn reference_closure(declared: &BTreeSet<String>, referenced: &BTreeSet<String>) -> Outcome {
    if referenced.is_empty() {
        return Outcome::skipped("architecture references no parameters");
    }
    let subject = Subject::Contract(ContractRole::Architecture);
    let unresolved: Vec<&String> = referenced.difference(declared).collect();
    if unresolved.is_empty() {
        return Outcome::single(ValidationResult::verified(
            subject,
            format!(
                "All {} architecture parameter references defined in spec",
                referenced.len()
            ),
        ));
    }
    Outcome::single(ValidationResult::error(
        Finding::UnresolvedReference,
        subject,
        format!(
            "Architecture references undefined parameters: {}",
            braced(unresolved)
        ),
    ))
}

/// Every component must appear, case-insensitively, in the plan excerpt.
pub fn component_coverage(components: &[String], excerpt: Option<&str>, window: StageWindow) -> Outcome {
    if components.is_empty() {
        return Outcome::skipped("architecture lists no core components");
    }
    let Some(excerpt) = excerpt else {
        return Outcome::skipped(format!("plan has no Stage {} section", window.start));
    };

    let haystack = excerpt.to_lowercase();
    let missing: Vec<&String> = components
        .iter()
        .filter(|c| !haystack.contains(&c.to_lowercase()))
        .collect();
    let subject = Subject::Contract(ContractRole::Plan);
    if missing.is_empty() {
        return Outcome::single(ValidationResult::verified(
            subject,
            "All DSP components from architecture referenced in plan",
        ));
    }
    Outcome::single(ValidationResult::warning(
        Finding::MissingCoverage,
        subject,
        format!(
            "DSP components not referenced in plan stages {}: {}",
            window,
            listed(missing)
        ),
    ))
}

/// Specification parameters against the parameters constructed in code.
pub fn parameter_parity(
    spec: &BTreeMap<String, ParameterDefinition>,
    code: &BTreeMap<String, ParamKind>,
    artifact: &str,
) -> Outcome {
    if spec.is_empty() {
        return Outcome::skipped("no parameters declared in parameter-spec.md yet");
    }
    let subject = || Subject::Artifact(artifact.to_string());
    if code.is_empty() {
        return Outcome::single(ValidationResult::error(
            Finding::MissingDeclaration,
            subject(),
            format!("No parameter declarations found in {artifact}"),
        ));
    }

    let mut results = Vec::new();
    let missing: Vec<&String> = spec.keys().filter(|id| !code.contains_key(*id)).collect();
    if !missing.is_empty() {
        results.push(ValidationResult::error(
            Finding::MissingDeclaration,
            subject(),
            format!("Missing parameters in code: {}", listed(missing)),
        ));
    }

    let extra: Vec<&String> = code.keys().filter(|id| !spec.contains_key(*id)).collect();
    if !extra.is_empty() {
        results.push(ValidationResult::warning(
            Finding::UndeclaredExtra,
            subject(),
            format!("Extra parameters in code (not in spec): {}", listed(extra)),
        ));
    }

    for (id, def) in spec {
        if let Some(kind) = code.get(id)
            && *kind != def.kind
        {
            results.push(ValidationResult::error(
                Finding::TypeMismatch,
                subject(),
                format!("Type mismatch for '{id}': spec has {}, code has {kind}", def.kind),
            ));
        }
    }

    if results.iter().all(|r| !r.is_error()) {
        results.insert(
            0,
            ValidationResult::verified(
                subject(),
                format!("All {} parameters from spec present in code", spec.len()),
            ),
        );
    }
    Outcome::Checked(results)
}

/// UI binding identifiers against the editor's relays.
pub fn gui_parity(ui_ids: &BTreeSet<String>, bindings: &EditorBindings, artifact: &str) -> Outcome {
    if ui_ids.is_empty() {
        return Outcome::skipped("no parameter bindings found in the UI");
    }
    let subject = || Subject::Artifact(artifact.to_string());
    if bindings.relays.is_empty() {
        return Outcome::single(ValidationResult::error(
            Finding::MissingDeclaration,
            subject(),
            format!("No relay declarations found in {artifact}"),
        ));
    }

    let mut results = Vec::new();
    let missing: Vec<&String> = ui_ids
        .iter()
        .filter(|id| !bindings.relays.contains_key(*id))
        .collect();
    if !missing.is_empty() {
        results.push(ValidationResult::error(
            Finding::MissingDeclaration,
            subject(),
            format!("Missing relays for UI parameters: {}", listed(missing)),
        ));
    }

    let extra: Vec<&String> = bindings
        .relays
        .keys()
        .filter(|id| !ui_ids.contains(*id))
        .collect();
    if !extra.is_empty() {
        results.push(ValidationResult::warning(
            Finding::UndeclaredExtra,
            subject(),
            format!("Extra relays in editor (not bound by UI): {}", listed(extra)),
        ));
    }

    for id in ui_ids {
        let Some(var) = bindings.relays.get(id) else {
            continue;
        };
        if !bindings.attached.contains(var) {
            results.push(ValidationResult::warning(
                Finding::MissingDeclaration,
                subject(),
                format!("No attachment found for relay '{var}' (parameter '{id}')"),
            ));
        }
    }
    for (id, var) in &bindings.relays {
        if !bindings.registered.contains(var) {
            results.push(ValidationResult::warning(
                Finding::MissingDeclaration,
                subject(),
                format!("Relay '{var}' for parameter '{id}' not registered with .withOptionsFrom()"),
            ));
        }
    }

    if results.is_empty() {
        results.push(ValidationResult::verified(
            subject(),
            format!(
                "All {} UI parameter bindings have corresponding relays",
                ui_ids.len()
            ),
        ));
    }
    Outcome::Checked(results)
}

/// Relays before the view, the view before attachments.
pub fn declaration_order(lines: &DeclarationLines, artifact: &str) -> Outcome {
    let Some(view) = lines.view() else {
        return Outcome::skipped(format!("no WebBrowserComponent declared in {artifact}"));
    };
    let subject = || Subject::Artifact(artifact.to_string());

    let mut results = Vec::new();
    for relay in lines.relays.iter().filter(|r| r.line > view.line) {
        results.push(ValidationResult::error(
            Finding::OrderingViolation,
            subject(),
            format!(
                "Relay '{}' declared at line {} after view '{}' at line {}; relays must be declared before the view",
                relay.name, relay.line, view.name, view.line
            ),
        ));
    }
    for attachment in lines.attachments.iter().filter(|a| a.line < view.line) {
        results.push(ValidationResult::error(
            Finding::OrderingViolation,
            subject(),
            format!(
                "Attachment '{}' declared at line {} before view '{}' at line {}; attachments must be declared after the view",
                attachment.name, attachment.line, view.name, view.line
            ),
        ));
    }

    if results.is_empty() {
        results.push(ValidationResult::verified(
            subject(),
            "Member declaration order is correct (relays, view, attachments)",
        ));
    }
    Outcome::Checked(results)
}

/// The processor must pull in the DSP module.
pub fn dsp_include(present: bool, artifact: &str) -> Outcome {
    let subject = Subject::Artifact(artifact.to_string());
    if present {
        return Outcome::single(ValidationResult::verified(subject, "juce_dsp module included"));
    }
    Outcome::single(ValidationResult::error(
        Finding::MissingDeclaration,
        subject,
        "#include <juce_dsp/juce_dsp.h> not found in processor sources",
    ))
}

/// Architecture components against those declared in the processor header.
pub fn dsp_members(components: &BTreeSet<String>, declared: &BTreeSet<String>, artifact: &str) -> Outcome {
    if components.is_empty() {
        return Outcome::skipped("architecture names no juce::dsp components");
    }
    let subject = Subject::Artifact(artifact.to_string());
    let missing: Vec<&String> = components.difference(declared).collect();
    if missing.is_empty() {
        return Outcome::single(ValidationResult::verified(
            subject,
            format!(
                "All {} DSP components from architecture declared in code",
                components.len()
            ),
        ));
    }
    Outcome::single(ValidationResult::error(
        Finding::MissingDeclaration,
        subject,
        format!("Missing DSP components in {artifact}: {}", listed(missing)),
    ))
}

/// `prepareToPlay` should prepare at least one component.
pub fn prepare_calls(body: Option<&str>, artifact: &str) -> Outcome {
    let subject = Subject::Artifact(artifact.to_string());
    match body {
        None => Outcome::single(ValidationResult::warning(
            Finding::MissingDeclaration,
            subject,
            format!("prepareToPlay() method not found in {artifact}"),
        )),
        Some(body) if !body.contains(".prepare(") => Outcome::single(ValidationResult::warning(
            Finding::MissingDeclaration,
            subject,
            "No .prepare() calls found in prepareToPlay(); components may not be initialized",
        )),
        Some(_) => Outcome::single(ValidationResult::verified(
            subject,
            "prepareToPlay() prepares DSP components",
        )),
    }
}
