//! Parameter specification against the parameters the processor constructs.

use crate::core::contracts::ContractRole;
use crate::core::error::GuardError;
use crate::core::reconcile;
use crate::core::report::{Outcome, Report};
use crate::extract::{contracts as facts, source};
use crate::validators::{PROCESSOR_SOURCE, PluginContext, run_check};
use std::path::PathBuf;

/// Plugins are discovered by their parameter specification.
pub fn anchor(ideas_dir: &str) -> PathBuf {
    PathBuf::from(ideas_dir).join(ContractRole::ParameterSpec.file_name())
}

pub fn validate(ctx: &PluginContext<'_>) -> Result<Report, GuardError> {
    let mut report = Report::new();
    report.note(ctx.banner("parameters"));

    let spec = ctx.contracts().read(ContractRole::ParameterSpec)?;
    let processor = ctx.read_optional(PROCESSOR_SOURCE)?;

    run_check(&mut report, "parameter-parity", || {
        let Some(spec) = spec else {
            return Ok(Outcome::skipped("parameter-spec.md not found"));
        };
        let Some(processor) = processor else {
            return Ok(Outcome::skipped(format!("{PROCESSOR_SOURCE} not found")));
        };
        Ok(reconcile::parameter_parity(
            &facts::spec_parameters(&spec),
            &source::code_parameters(&processor),
            PROCESSOR_SOURCE,
        ))
    })?;

    Ok(report)
}
