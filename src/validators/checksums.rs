//! Contract immutability: stored snapshot digests against current documents.

use crate::core::checksum::{ChecksumMap, ChecksumStore};
use crate::core::contracts::ContractSet;
use crate::core::error::GuardError;
use crate::core::report::{Finding, Outcome, Report, Subject, ValidationResult};
use crate::core::stage::StageGate;
use crate::validators::{PluginContext, run_check};

/// Verify `stored` against the documents in `contracts`, one result per
/// stored entry.
pub fn verify_stored(contracts: &ContractSet, stored: &ChecksumMap) -> Result<Report, GuardError> {
    let mut report = Report::new();
    run_check(&mut report, "checksums", || {
        if stored.is_empty() {
            return Ok(Outcome::skipped("no stored checksums to compare"));
        }
        Ok(Outcome::Checked(ChecksumStore::new(contracts).verify(stored)?))
    })?;
    Ok(report)
}

/// Stage-gated verification against the snapshot held in the stage marker.
pub fn validate(ctx: &PluginContext<'_>) -> Result<Report, GuardError> {
    let mut report = Report::new();
    report.note(ctx.banner("contract checksums"));

    let gate = StageGate::new(ctx.config.marker_path(&ctx.dir), ctx.config.immutable_stages);
    let window = gate.window();
    let marker = gate.marker()?;
    let marker_name = ctx.config.marker_file.clone();

    let Some(stage) = marker.stage else {
        report.record(
            "stage-gate",
            Outcome::skipped(format!("no stage recorded in {marker_name}")),
        );
        return Ok(report);
    };
    report.note(format!("stage={} immutable_stages={}", stage, window));

    if !window.contains(stage) {
        report.record(
            "stage-gate",
            Outcome::skipped(format!(
                "stage {stage} is outside the immutable window {window}"
            )),
        );
        return Ok(report);
    }

    if marker.contract_checksums.is_empty() {
        report.push(ValidationResult::warning(
            Finding::MissingDocument,
            Subject::Document(marker_name.clone()),
            format!("No contract checksums recorded in {marker_name}; the approval snapshot was never taken"),
        ));
        return Ok(report);
    }

    report.merge(verify_stored(&ctx.contracts(), &marker.contract_checksums)?);
    Ok(report)
}
