//! Architecture DSP components against the processor's declarations.

use crate::core::contracts::ContractRole;
use crate::core::error::GuardError;
use crate::core::reconcile;
use crate::core::report::{Outcome, Report};
use crate::extract::{contracts as facts, source};
use crate::validators::{PROCESSOR_HEADER, PROCESSOR_SOURCE, PluginContext, run_check};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub fn anchor(ideas_dir: &str) -> PathBuf {
    PathBuf::from(ideas_dir).join(ContractRole::Architecture.file_name())
}

pub fn validate(ctx: &PluginContext<'_>) -> Result<Report, GuardError> {
    let mut report = Report::new();
    report.note(ctx.banner("DSP components"));

    let Some(arch) = ctx.contracts().read(ContractRole::Architecture)? else {
        report.record("dsp-components", Outcome::skipped("architecture.md not found"));
        return Ok(report);
    };
    let components = facts::dsp_component_references(&arch);
    if components.is_empty() {
        report.record(
            "dsp-components",
            Outcome::skipped("no juce::dsp components named in architecture.md"),
        );
        return Ok(report);
    }
    report.note(format!(
        "architecture names {} DSP components: {}",
        components.len(),
        components.iter().cloned().collect::<Vec<_>>().join(", ")
    ));

    let header = ctx.read_optional(PROCESSOR_HEADER)?;
    let implementation = ctx.read_optional(PROCESSOR_SOURCE)?;

    run_check(&mut report, "dsp-include", || {
        if header.is_none() && implementation.is_none() {
            return Ok(Outcome::skipped(format!(
                "{PROCESSOR_HEADER} and {PROCESSOR_SOURCE} not found"
            )));
        }
        let present = [&header, &implementation]
            .into_iter()
            .flatten()
            .any(|text| source::includes_dsp_module(text));
        Ok(reconcile::dsp_include(present, PROCESSOR_SOURCE))
    })?;

    run_check(&mut report, "dsp-components", || {
        let Some(header) = header.as_deref() else {
            return Ok(Outcome::skipped(format!("{PROCESSOR_HEADER} not found")));
        };
        let declared: BTreeSet<String> = components
            .iter()
            .filter(|c| source::dsp_declared(header, c))
            .cloned()
            .collect();
        Ok(reconcile::dsp_members(&components, &declared, PROCESSOR_HEADER))
    })?;

    run_check(&mut report, "dsp-prepare", || {
        let Some(implementation) = implementation.as_deref() else {
            return Ok(Outcome::skipped(format!("{PROCESSOR_SOURCE} not found")));
        };
        let body = source::prepare_to_play_body(implementation);
        Ok(reconcile::prepare_calls(body.as_deref(), PROCESSOR_SOURCE))
    })?;

    Ok(report)
}
