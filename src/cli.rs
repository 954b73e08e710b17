//! CLI struct definitions for the contract-guard command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "contract-guard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Keeps approved plugin contracts immutable and checks that briefs, specs, architecture, plan and generated sources agree."
)]
pub(crate) struct Cli {
    /// Configuration file (defaults to ./contract-guard.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Output format: 'text' or 'json'.
    #[clap(long, global = true, default_value = "text")]
    pub format: String,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub(crate) struct PluginArgs {
    /// Plugin directory. Falls back to $PLUGIN_PATH, then to the first
    /// plugin under the plugins directory that has the relevant files.
    pub path: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub(crate) struct ContractsCli {
    /// Plugin directory (same fallbacks as the other commands).
    pub path: Option<PathBuf>,
    /// Verify against a JSON object of role -> "sha256:<hex>".
    #[clap(long)]
    pub checksums: Option<String>,
    /// Run the cross-contract consistency rules.
    #[clap(long)]
    pub cross_contract: bool,
    /// Print current checksums as JSON and exit.
    #[clap(long)]
    pub calculate: bool,
}

#[derive(clap::Args, Debug)]
pub(crate) struct EvolveCli {
    /// Plugin directory (same fallbacks as the other commands).
    pub path: Option<PathBuf>,
    /// Contract role: creative_brief, parameter_spec, architecture or plan.
    #[clap(long)]
    pub contract: String,
    /// Description of the change.
    #[clap(long, short = 'm')]
    pub message: String,
    /// Record the entry even while contracts are immutable.
    #[clap(long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Verify contract checksums against the stage marker snapshot
    Checksums(PluginArgs),
    /// Check parameter counts, identifiers and components across contracts
    CrossContract(PluginArgs),
    /// Check the parameter spec against the processor's parameters
    Parameters(PluginArgs),
    /// Check architecture DSP components against the processor
    Dsp(PluginArgs),
    /// Check UI bindings against editor relays, attachments and member order
    Gui(PluginArgs),
    /// Check the generated build manifest and source layout
    Foundation(PluginArgs),
    /// Checksum calculation and verification plus cross-contract checks
    Contracts(ContractsCli),
    /// Append an entry to a contract's evolution history
    Evolve(EvolveCli),
}
