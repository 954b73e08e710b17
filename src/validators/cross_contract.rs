//! Contract-vs-contract consistency: parameter counts, identifier closure
//! and component coverage in the plan.

use crate::core::config::StageWindow;
use crate::core::contracts::{ContractRole, ContractSet};
use crate::core::error::GuardError;
use crate::core::reconcile;
use crate::core::report::{Outcome, Report};
use crate::extract::contracts as facts;
use crate::validators::run_check;

pub fn validate(contracts: &ContractSet, coverage: StageWindow) -> Result<Report, GuardError> {
    let brief = contracts.read(ContractRole::CreativeBrief)?;
    let spec = contracts.read(ContractRole::ParameterSpec)?;
    let arch = contracts.read(ContractRole::Architecture)?;
    let plan = contracts.read(ContractRole::Plan)?;

    let mut report = Report::new();

    run_check(&mut report, "parameter-count", || {
        let declared = spec
            .as_deref()
            .map(facts::declared_identifiers)
            .filter(|ids| !ids.is_empty())
            .map(|ids| ids.len());
        let mapped = arch
            .as_deref()
            .and_then(facts::mapping_table)
            .map(|m| m.rows)
            .filter(|rows| *rows > 0);
        Ok(reconcile::count_agreement(&[
            (
                "creative-brief",
                brief.as_deref().and_then(facts::brief_parameter_rows),
            ),
            ("parameter-spec", spec.as_deref().and_then(facts::declared_total)),
            ("parameter-spec-actual", declared),
            ("architecture", mapped),
        ]))
    })?;

    run_check(&mut report, "reference-closure", || {
        let (Some(spec), Some(arch)) = (spec.as_deref(), arch.as_deref()) else {
            return Ok(Outcome::skipped(
                "parameter-spec.md and architecture.md are both required",
            ));
        };
        let references = facts::mapping_table(arch)
            .map(|m| m.references)
            .unwrap_or_default();
        Ok(reconcile::reference_closure(
            &facts::declared_identifiers(spec),
            &references,
        ))
    })?;

    run_check(&mut report, "component-coverage", || {
        let (Some(arch), Some(plan)) = (arch.as_deref(), plan.as_deref()) else {
            return Ok(Outcome::skipped(
                "architecture.md and plan.md are both required",
            ));
        };
        Ok(reconcile::component_coverage(
            &facts::core_components(arch),
            facts::stage_excerpt(plan, coverage),
            coverage,
        ))
    })?;

    Ok(report)
}
