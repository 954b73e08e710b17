//! contract-guard: contract integrity and cross-artifact consistency for
//! staged plugin generation.
//!
//! A plugin is described by four contract documents under its ideas
//! directory (creative brief, parameter spec, architecture, plan). Once
//! approved they drive code generation, and this crate keeps them honest:
//!
//! - **Immutability**: SHA-256 digests of each contract are snapshotted into
//!   the stage marker; during the immutable stage window any byte change is
//!   a failure.
//! - **Cross-contract consistency**: parameter counts, identifier closure and
//!   component coverage across the contracts.
//! - **Contract vs. code**: parameters, DSP components, UI bindings and the
//!   relay -> view -> attachment member order in the generated sources.
//!
//! # Exit codes
//!
//! - `0`: all checks passed, or there was nothing to check yet
//! - `1`: at least one error (or the engine could not run)
//! - `2`: no errors, at least one warning
//!
//! # Layout
//!
//! - [`core`]: roles, config, checksums, stage gate, evolution log,
//!   reconciliation rules, reporting
//! - [`extract`]: fact extractors for markdown and generated sources
//! - [`validators`]: one module per entry point

pub mod core;
pub mod extract;
pub mod validators;

mod cli;

use crate::cli::{Cli, Command, ContractsCli, EvolveCli, PluginArgs};
use crate::core::checksum::{ChecksumMap, ChecksumStore};
use crate::core::config::{GuardConfig, load_config};
use crate::core::contracts::ContractRole;
use crate::core::error::GuardError;
use crate::core::evolution::{EvolutionEntry, EvolutionLog};
use crate::core::output::{self, OutputFormat};
use crate::core::report::{Outcome, Report};
use crate::core::stage::StageGate;
use crate::core::workspace::PluginLocator;
use crate::validators::PluginContext;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Outcome of a run when no plugin could be located.
fn no_plugin_report(cmd: &str, anchor: &Path) -> Report {
    let mut report = Report::new();
    report.record(
        cmd,
        Outcome::skipped(format!(
            "no active plugin with {} found",
            anchor.display()
        )),
    );
    report
}

fn validate_plugin(
    cmd: &str,
    locator: &PluginLocator,
    config: &GuardConfig,
    args: PluginArgs,
    anchor: PathBuf,
    format: OutputFormat,
    validate: impl FnOnce(&PluginContext<'_>) -> Result<Report, GuardError>,
) -> Result<i32, GuardError> {
    let report = match locator.locate(args.path.as_deref(), &anchor)? {
        Some(dir) => validate(&PluginContext::new(dir, config))?,
        None => no_plugin_report(cmd, &anchor),
    };
    output::emit(cmd, &report, format);
    Ok(report.status().exit_code())
}

fn run_contracts(
    args: ContractsCli,
    locator: &PluginLocator,
    config: &GuardConfig,
    format: OutputFormat,
) -> Result<i32, GuardError> {
    let anchor = PathBuf::from(&config.ideas_dir);
    let Some(dir) = locator.locate(args.path.as_deref(), &anchor)? else {
        let report = no_plugin_report("contracts", &anchor);
        output::emit("contracts", &report, format);
        return Ok(report.status().exit_code());
    };
    let contracts = config.contract_set(&dir);

    if args.calculate {
        let current = ChecksumStore::new(&contracts).digest_all()?;
        println!("{}", serde_json::to_string_pretty(&current)?);
        return Ok(0);
    }

    let mut report = Report::new();
    if let Some(raw) = args.checksums.as_deref() {
        let stored: ChecksumMap = serde_json::from_str(raw).map_err(|e| {
            GuardError::InvalidInput(format!(
                "--checksums must be a JSON object of role -> digest: {}",
                e
            ))
        })?;
        report.merge(validators::checksums::verify_stored(&contracts, &stored)?);
    }
    if args.cross_contract {
        report.merge(validators::cross_contract::validate(
            &contracts,
            config.coverage_stages,
        )?);
    }
    if args.checksums.is_none() && !args.cross_contract {
        report.record(
            "contracts",
            Outcome::skipped("no mode selected (--checksums, --cross-contract or --calculate)"),
        );
    }

    output::emit("contracts", &report, format);
    Ok(report.status().exit_code())
}

fn run_evolve(args: EvolveCli, locator: &PluginLocator, config: &GuardConfig) -> Result<i32, GuardError> {
    let role: ContractRole = args.contract.parse()?;
    if args.message.trim().is_empty() {
        return Err(GuardError::InvalidInput(
            "evolution message must not be empty".into(),
        ));
    }

    let anchor = PathBuf::from(&config.ideas_dir).join(role.file_name());
    let Some(dir) = locator.locate(args.path.as_deref(), &anchor)? else {
        return Err(GuardError::PathError(format!(
            "no plugin with {} found",
            anchor.display()
        )));
    };

    let gate = StageGate::new(config.marker_path(&dir), config.immutable_stages);
    if !args.force && gate.immutability_required()? {
        let stage = gate.current_stage()?.unwrap_or_default();
        return Err(GuardError::Refused(format!(
            "{} is immutable during stages {} (current stage {}); pass --force to record the change anyway",
            role,
            gate.window(),
            stage
        )));
    }

    let contracts = config.contract_set(&dir);
    let entry = EvolutionEntry::now(args.message);
    if EvolutionLog::new(&contracts).append_entry(role, &entry)? {
        println!(
            "{} evolve: recorded [{}] in {}",
            "✓".bright_green(),
            entry.timestamp,
            role
        );
    } else {
        eprintln!("evolve: {} not found; nothing recorded", role);
    }
    Ok(0)
}

/// Parse arguments, run one entry point, and return the process exit code.
pub fn run() -> Result<i32, GuardError> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;
    let format: OutputFormat = cli.format.parse()?;
    let locator = PluginLocator::new(cwd, &config.plugins_dir);
    let ideas_anchor = PathBuf::from(&config.ideas_dir);

    match cli.command {
        Command::Checksums(args) => validate_plugin(
            "checksums",
            &locator,
            &config,
            args,
            ideas_anchor,
            format,
            validators::checksums::validate,
        ),
        Command::CrossContract(args) => validate_plugin(
            "cross-contract",
            &locator,
            &config,
            args,
            ideas_anchor,
            format,
            |ctx| validators::cross_contract::validate(&ctx.contracts(), ctx.config.coverage_stages),
        ),
        Command::Parameters(args) => validate_plugin(
            "parameters",
            &locator,
            &config,
            args,
            validators::parameters::anchor(&config.ideas_dir),
            format,
            validators::parameters::validate,
        ),
        Command::Dsp(args) => validate_plugin(
            "dsp",
            &locator,
            &config,
            args,
            validators::dsp::anchor(&config.ideas_dir),
            format,
            validators::dsp::validate,
        ),
        Command::Gui(args) => validate_plugin(
            "gui",
            &locator,
            &config,
            args,
            validators::gui::anchor(),
            format,
            validators::gui::validate,
        ),
        Command::Foundation(args) => validate_plugin(
            "foundation",
            &locator,
            &config,
            args,
            validators::foundation::anchor(),
            format,
            validators::foundation::validate,
        ),
        Command::Contracts(args) => run_contracts(args, &locator, &config, format),
        Command::Evolve(args) => run_evolve(args, &locator, &config),
    }
}
