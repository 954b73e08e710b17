use contract_guard::core::checksum::{ChecksumMap, ChecksumStore, Digest};
use contract_guard::core::config::{GuardConfig, StageWindow, load_config};
use contract_guard::core::contracts::{ContractRole, ContractSet};
use contract_guard::core::error::GuardError;
use contract_guard::core::evolution::{EvolutionEntry, EvolutionLog, HISTORY_HEADING};
use contract_guard::core::report::{Finding, Subject};
use contract_guard::core::stage::StageGate;
use std::fs;
use tempfile::tempdir;

fn ideas_with(files: &[(&str, &str)]) -> (tempfile::TempDir, ContractSet) {
    let tmp = tempdir().expect("tempdir");
    for (name, content) in files {
        fs::write(tmp.path().join(name), content).expect("write contract");
    }
    let set = ContractSet::new(tmp.path(), ContractRole::ALL.to_vec());
    (tmp, set)
}

#[test]
fn digest_is_deterministic_and_byte_sensitive() {
    let (tmp, set) = ideas_with(&[("creative-brief.md", "# Brief\n")]);
    let store = ChecksumStore::new(&set);

    let first = store.digest(ContractRole::CreativeBrief).unwrap().unwrap();
    let second = store.digest(ContractRole::CreativeBrief).unwrap().unwrap();
    assert_eq!(first, second);

    fs::write(tmp.path().join("creative-brief.md"), "# Brief\n.").unwrap();
    let changed = store.digest(ContractRole::CreativeBrief).unwrap().unwrap();
    assert_ne!(first, changed);

    assert_eq!(store.digest(ContractRole::Plan).unwrap(), None);
}

#[test]
fn digest_all_excludes_absent_documents() {
    let (_tmp, set) = ideas_with(&[("plan.md", "# Plan\n"), ("architecture.md", "# Arch\n")]);
    let map = ChecksumStore::new(&set).digest_all().unwrap();
    assert_eq!(map.keys(), vec!["architecture", "plan"]);
    assert!(map.get("plan").unwrap().starts_with("sha256:"));
}

#[test]
fn verify_follows_stored_order_and_classifies() {
    let (_tmp, set) = ideas_with(&[("plan.md", "# Plan\n"), ("creative-brief.md", "# Brief\n")]);
    let mut stored = ChecksumMap::new();
    stored.insert("plan", Digest::of_bytes(b"# Plan\n").to_string());
    stored.insert("architecture", Digest::of_bytes(b"# Arch\n").to_string());
    stored.insert("creative_brief", Digest::of_bytes(b"# Old brief\n").to_string());

    let results = ChecksumStore::new(&set).verify(&stored).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].passed);
    assert_eq!(results[0].subject, Subject::Contract(ContractRole::Plan));
    assert_eq!(results[1].finding, Finding::MissingDocument);
    assert_eq!(results[2].finding, Finding::ChecksumMismatch);
}

#[test]
fn verify_passes_over_roles_outside_the_configured_set() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("creative-brief.md"), "# Brief\n").unwrap();
    fs::write(tmp.path().join("plan.md"), "# Plan\n").unwrap();
    let set = ContractSet::new(tmp.path(), vec![ContractRole::Plan]);

    let mut stored = ChecksumMap::new();
    stored.insert("creative_brief", Digest::of_bytes(b"# Brief\n").to_string());
    stored.insert("plan", Digest::of_bytes(b"# Plan\n").to_string());
    stored.insert("notes", Digest::of_bytes(b"x").to_string());

    let results = ChecksumStore::new(&set).verify(&stored).unwrap();
    assert_eq!(results.len(), 2, "{:?}", results);
    assert!(results[0].passed);
    assert_eq!(results[0].subject, Subject::Contract(ContractRole::Plan));
    assert_eq!(results[1].finding, Finding::MissingDocument);
    assert_eq!(results[1].subject, Subject::Document("notes.md".into()));
}

#[test]
fn checksum_map_json_keeps_insertion_order() {
    let raw = r#"{"plan": "sha256:aa", "creative_brief": "sha256:bb"}"#;
    let map: ChecksumMap = serde_json::from_str(raw).unwrap();
    assert_eq!(map.keys(), vec!["plan", "creative_brief"]);
    let back = serde_json::to_string(&map).unwrap();
    assert!(back.find("plan").unwrap() < back.find("creative_brief").unwrap());
}

#[test]
fn evolution_appends_newest_first_under_one_heading() {
    let (tmp, set) = ideas_with(&[("plan.md", "# Plan\n\nStage 1: build\n")]);
    let log = EvolutionLog::new(&set);

    let older = EvolutionEntry {
        timestamp: "2026-01-01 10:00:00".into(),
        description: "first change".into(),
    };
    let newer = EvolutionEntry {
        timestamp: "2026-01-02 10:00:00".into(),
        description: "second change".into(),
    };
    assert!(log.append_entry(ContractRole::Plan, &older).unwrap());
    assert!(log.append_entry(ContractRole::Plan, &newer).unwrap());

    let content = fs::read_to_string(tmp.path().join("plan.md")).unwrap();
    assert_eq!(content.matches(HISTORY_HEADING).count(), 1);
    let entries = log.entries(ContractRole::Plan).unwrap();
    assert_eq!(entries, vec![newer, older]);
    assert!(content.starts_with("# Plan\n\nStage 1: build\n"));
}

#[test]
fn evolution_on_missing_document_is_a_no_op() {
    let (tmp, set) = ideas_with(&[]);
    let log = EvolutionLog::new(&set);
    let wrote = log
        .append_entry(ContractRole::Architecture, &EvolutionEntry::now("x"))
        .unwrap();
    assert!(!wrote);
    assert!(!tmp.path().join("architecture.md").exists());
}

#[test]
fn stage_gate_uses_configured_window() {
    let tmp = tempdir().unwrap();
    let marker = tmp.path().join(".continue-here.md");
    fs::write(&marker, "---\nstage: 5\n---\n").unwrap();

    assert!(StageGate::new(&marker, StageWindow::new(2, 5)).immutability_required().unwrap());
    assert!(!StageGate::new(&marker, StageWindow::new(1, 4)).immutability_required().unwrap());

    let missing = StageGate::new(tmp.path().join("absent.md"), StageWindow::new(2, 5));
    assert_eq!(missing.current_stage().unwrap(), None);
    assert!(!missing.immutability_required().unwrap());
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join("contract-guard.toml"),
        "contracts = [\"parameter_spec\", \"architecture\"]\n\n[immutable_stages]\nstart = 1\nend = 4\n",
    )
    .unwrap();

    let config = load_config(None, tmp.path()).unwrap();
    assert_eq!(config.immutable_stages, StageWindow::new(1, 4));
    assert_eq!(config.coverage_stages, GuardConfig::default().coverage_stages);
    let set = config.contract_set(tmp.path());
    assert_eq!(
        set.roles(),
        &[ContractRole::ParameterSpec, ContractRole::Architecture]
    );
}

#[test]
fn config_rejects_unknown_keys_and_missing_explicit_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.toml");
    fs::write(&path, "stages = 3\n").unwrap();
    assert!(matches!(
        load_config(Some(&path), tmp.path()),
        Err(GuardError::ConfigError(_))
    ));
    assert!(load_config(Some(&tmp.path().join("nope.toml")), tmp.path()).is_err());
}
