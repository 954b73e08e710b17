//! Generated project layout: build manifest contents and core source files.

use crate::core::error::GuardError;
use crate::core::report::{Finding, Outcome, Report, Subject, ValidationResult};
use crate::validators::{
    BUILD_MANIFEST, EDITOR_HEADER, EDITOR_SOURCE, PROCESSOR_HEADER, PROCESSOR_SOURCE,
    PluginContext, run_check,
};
use std::path::PathBuf;

const REQUIRED_MODULES: [&str; 2] = ["juce_audio_processors", "juce_audio_basics"];
const PLUGIN_FORMATS: [&str; 3] = ["VST3", "AU", "Standalone"];
const REQUIRED_SOURCES: [&str; 4] = [PROCESSOR_HEADER, PROCESSOR_SOURCE, EDITOR_HEADER, EDITOR_SOURCE];

pub fn anchor() -> PathBuf {
    PathBuf::from(BUILD_MANIFEST)
}

fn manifest_results(manifest: &str) -> Vec<ValidationResult> {
    let subject = || Subject::Artifact(BUILD_MANIFEST.to_string());
    let missing = |message: String| {
        ValidationResult::error(Finding::MissingDeclaration, subject(), message)
    };

    let mut results = Vec::new();
    if !manifest.contains("juce_add_plugin") {
        results.push(missing("Missing juce_add_plugin() declaration".into()));
    }
    if !manifest.contains("PRODUCT_NAME") {
        results.push(missing(
            "Missing PRODUCT_NAME in juce_add_plugin(); required for installation".into(),
        ));
    }
    for module in REQUIRED_MODULES {
        if !manifest.contains(module) {
            results.push(missing(format!("Missing required JUCE module: {module}")));
        }
    }
    if !PLUGIN_FORMATS.iter().any(|f| manifest.contains(f)) {
        results.push(missing(format!(
            "No plugin formats specified ({})",
            PLUGIN_FORMATS.join(", ")
        )));
    }
    if results.is_empty() {
        results.push(ValidationResult::verified(
            subject(),
            "CMakeLists.txt has required JUCE configuration",
        ));
    }
    results
}

pub fn validate(ctx: &PluginContext<'_>) -> Result<Report, GuardError> {
    let mut report = Report::new();
    report.note(ctx.banner("foundation"));

    let Some(manifest) = ctx.read_optional(BUILD_MANIFEST)? else {
        report.record(
            "build-manifest",
            Outcome::skipped("CMakeLists.txt not found; nothing generated yet"),
        );
        return Ok(report);
    };

    run_check(&mut report, "build-manifest", || {
        Ok(Outcome::Checked(manifest_results(&manifest)))
    })?;

    run_check(&mut report, "source-files", || {
        let missing: Vec<&str> = REQUIRED_SOURCES
            .iter()
            .copied()
            .filter(|rel| !ctx.path(rel).is_file())
            .collect();
        if missing.is_empty() {
            return Ok(Outcome::single(ValidationResult::verified(
                Subject::Artifact("Source".into()),
                "All required source files present",
            )));
        }
        Ok(Outcome::Checked(
            missing
                .into_iter()
                .map(|rel| {
                    ValidationResult::error(
                        Finding::MissingDocument,
                        Subject::Artifact(rel.to_string()),
                        format!("Missing source file: {rel}"),
                    )
                })
                .collect(),
        ))
    })?;

    run_check(&mut report, "build-directory", || {
        let subject = Subject::Artifact("build".into());
        if ctx.path("build").is_dir() {
            return Ok(Outcome::single(ValidationResult::verified(
                subject,
                "Build directory exists",
            )));
        }
        Ok(Outcome::single(ValidationResult::warning(
            Finding::MissingDocument,
            subject,
            "Build directory not found; build may not have been attempted",
        )))
    })?;

    Ok(report)
}
