use contract_guard::core::config::StageWindow;
use contract_guard::core::contracts::{ContractRole, ContractSet};
use contract_guard::core::report::{Finding, RunStatus, Severity};
use contract_guard::validators::cross_contract;
use std::fs;
use tempfile::tempdir;

const BRIEF: &str = "# TapeAge - Creative Brief

## Parameters

| Parameter | Range | Default | Description |
|-----------|-------|---------|-------------|
| Drive | 0-100% | 30% | Tape saturation |
| Age | 0-100% | 20% | Wow and flutter |
| Mix | 0-100% | 100% | Dry/wet |
";

const SPEC: &str = "# TapeAge - Parameter Specification

**Total Parameters:** 3

## Parameters

### DRIVE
- **Type:** Float
- **Range:** 0.0 to 1.0

### AGE
- **Type:** Float

### MIX
- **Type:** Float
";

const ARCH: &str = "# TapeAge - Architecture

## Core Components

- **Saturator**: tanh waveshaper
- **Modulated Delay**: wow and flutter
- Dry/Wet Mixer - equal power

## Parameter Mapping

| Parameter | Component | Usage |
|-----------|-----------|-------|
| DRIVE | Saturator | Drive amount |
| AGE | Modulated Delay | Depth |
| MIX | Dry/Wet Mixer | Blend |
";

const PLAN: &str = "# TapeAge - Implementation Plan

### Stage 1: Foundation
Project skeleton.

### Stage 2: DSP
- Saturator
- Modulated delay line
- Dry/wet mixer

### Stage 3: GUI
- WebView UI
";

fn contracts(files: &[(ContractRole, &str)]) -> (tempfile::TempDir, ContractSet) {
    let tmp = tempdir().unwrap();
    for (role, content) in files {
        fs::write(tmp.path().join(role.file_name()), content).unwrap();
    }
    let set = ContractSet::new(tmp.path(), ContractRole::ALL.to_vec());
    (tmp, set)
}

#[test]
fn consistent_contract_set_passes_every_rule() {
    let (_tmp, set) = contracts(&[
        (ContractRole::CreativeBrief, BRIEF),
        (ContractRole::ParameterSpec, SPEC),
        (ContractRole::Architecture, ARCH),
        (ContractRole::Plan, PLAN),
    ]);
    let report = cross_contract::validate(&set, StageWindow::new(1, 2)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed, "{:?}", report.results);
    assert_eq!(report.passes().count(), 3);
    assert!(
        report
            .results
            .iter()
            .any(|r| r.message == "Parameter count consistent across contracts: 3 parameters")
    );
}

#[test]
fn brief_with_extra_row_is_a_single_count_error() {
    let brief = format!("{BRIEF}| Tone | 0-100% | 50% | Tilt EQ |\n");
    let (_tmp, set) = contracts(&[
        (ContractRole::CreativeBrief, brief.as_str()),
        (ContractRole::ParameterSpec, SPEC),
        (ContractRole::Architecture, ARCH),
    ]);
    let report = cross_contract::validate(&set, StageWindow::new(1, 2)).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].finding, Finding::CountMismatch);
    for part in [
        "creative-brief=4",
        "parameter-spec=3",
        "parameter-spec-actual=3",
        "architecture=3",
    ] {
        assert!(errors[0].message.contains(part), "{}", errors[0].message);
    }
}

#[test]
fn component_missing_from_plan_stages_is_a_warning() {
    let plan = PLAN.replace("- Saturator\n", "");
    let (_tmp, set) = contracts(&[
        (ContractRole::Architecture, ARCH),
        (ContractRole::Plan, plan.as_str()),
    ]);
    let report = cross_contract::validate(&set, StageWindow::new(1, 2)).unwrap();
    assert_eq!(report.status(), RunStatus::PassedWithWarnings);
    let warning = report.warnings().next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert!(warning.message.contains("Saturator"));
    assert!(!warning.message.contains("Modulated Delay"));
}

#[test]
fn narrower_coverage_window_stops_before_stage_two() {
    let (_tmp, set) = contracts(&[
        (ContractRole::Architecture, ARCH),
        (ContractRole::Plan, PLAN),
    ]);
    let report = cross_contract::validate(&set, StageWindow::new(1, 1)).unwrap();
    assert_eq!(report.status(), RunStatus::PassedWithWarnings);
}

#[test]
fn roles_outside_the_configured_set_are_ignored() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("creative-brief.md"), BRIEF.replace("| Mix", "| Tone |x|x|x|\n| Mix")).unwrap();
    fs::write(tmp.path().join("parameter-spec.md"), SPEC).unwrap();
    fs::write(tmp.path().join("architecture.md"), ARCH).unwrap();
    let set = ContractSet::new(
        tmp.path(),
        vec![ContractRole::ParameterSpec, ContractRole::Architecture],
    );
    let report = cross_contract::validate(&set, StageWindow::new(1, 2)).unwrap();
    assert_eq!(report.status(), RunStatus::Passed);
}
