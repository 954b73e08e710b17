//! Console and JSON rendering for validation runs.
//!
//! Passing lines go to stdout; warnings, errors and skip notes go to stderr.

use crate::core::report::{Report, Severity};
use crate::core::time;
use colored::Colorize;
use serde_json::json;

pub const TRACE_ENV: &str = "CONTRACT_GUARD_TRACE";

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Render up to `max_items` messages with compact formatting.
pub fn preview_messages(messages: &[String], max_items: usize, max_chars: usize) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let shown = messages
        .iter()
        .take(max_items)
        .map(|m| compact_line(m, max_chars))
        .collect::<Vec<_>>()
        .join(" | ");
    if messages.len() > max_items {
        format!("{} (+{} more)", shown, messages.len() - max_items)
    } else {
        shown
    }
}

pub fn trace_enabled() -> bool {
    std::env::var(TRACE_ENV).ok().as_deref() == Some("1")
}

pub fn trace_check(name: &str) {
    if trace_enabled() {
        eprintln!("contract-guard: trace {}", name);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::core::error::GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(crate::core::error::GuardError::InvalidInput(format!(
                "unknown output format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

pub fn emit(cmd: &str, report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Text => print_text(cmd, report),
        OutputFormat::Json => println!("{}", render_json(cmd, report)),
    }
}

pub fn print_text(cmd: &str, report: &Report) {
    for note in &report.notes {
        eprintln!("{}: {}", cmd, note);
    }
    for result in &report.results {
        match (result.passed, result.severity) {
            (true, _) | (false, Severity::Info) => {
                println!("{} {}", "✓".bright_green(), result.message)
            }
            (false, Severity::Warning) => eprintln!(
                "{} {}",
                "⚠  WARNING:".bright_yellow().bold(),
                result.message
            ),
            (false, Severity::Error) => {
                eprintln!("{} {}", "❌ ERROR:".bright_red().bold(), result.message)
            }
        }
    }
    for skipped in &report.skipped {
        eprintln!(
            "{} skipped {}: {}",
            "·".dimmed(),
            skipped.check,
            skipped.reason
        );
    }

    let failures: Vec<String> = report.errors().map(|r| r.message.clone()).collect();
    let warnings: Vec<String> = report.warnings().map(|r| r.message.clone()).collect();
    eprintln!(
        "{}: summary pass={} fail={} warn={} skipped={} status={}",
        cmd,
        report.passes().count(),
        failures.len(),
        warnings.len(),
        report.skipped.len(),
        report.status().as_str()
    );
    if !failures.is_empty() {
        eprintln!(
            "{}: failures {}: {}",
            cmd,
            failures.len(),
            preview_messages(&failures, 2, 110)
        );
    }
}

pub fn render_json(cmd: &str, report: &Report) -> serde_json::Value {
    let status = report.status();
    time::command_envelope(
        cmd,
        status.as_str(),
        json!({
            "exit_code": status.exit_code(),
            "counts": {
                "passed": report.passes().count(),
                "errors": report.errors().count(),
                "warnings": report.warnings().count(),
                "skipped": report.skipped.len(),
            },
            "results": report.results,
            "skipped": report.skipped,
            "notes": report.notes,
        }),
    )
}
