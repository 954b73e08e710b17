//! Web UI bindings against the editor's relays, attachments and member order.

use crate::core::error::GuardError;
use crate::core::reconcile;
use crate::core::report::{Outcome, Report};
use crate::extract::ui;
use crate::validators::{
    EDITOR_HEADER, EDITOR_SOURCE, PluginContext, UI_INDEX, UI_SCRIPTS_DIR, read_optional,
    run_check,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

pub fn anchor() -> PathBuf {
    PathBuf::from(UI_INDEX)
}

/// Binding identifiers from the page and every script next to it.
fn ui_binding_identifiers(ctx: &PluginContext<'_>) -> Result<BTreeSet<String>, GuardError> {
    let mut ids = BTreeSet::new();
    if let Some(html) = ctx.read_optional(UI_INDEX)? {
        ids.extend(ui::binding_identifiers(&html));
    }

    let scripts_dir = ctx.path(UI_SCRIPTS_DIR);
    if scripts_dir.is_dir() {
        let mut scripts: Vec<PathBuf> = fs::read_dir(&scripts_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "js"))
            .collect();
        scripts.sort();
        for script in scripts {
            if let Some(text) = read_optional(&script)? {
                ids.extend(ui::binding_identifiers(&text));
            }
        }
    }
    Ok(ids)
}

pub fn validate(ctx: &PluginContext<'_>) -> Result<Report, GuardError> {
    let mut report = Report::new();
    report.note(ctx.banner("GUI bindings"));

    let ids = ui_binding_identifiers(ctx)?;
    if ids.is_empty() {
        report.record(
            "gui-bindings",
            Outcome::skipped("no parameter bindings found in the UI"),
        );
        return Ok(report);
    }
    report.note(format!(
        "UI binds {} parameters: {}",
        ids.len(),
        ids.iter().cloned().collect::<Vec<_>>().join(", ")
    ));

    let header = ctx.read_optional(EDITOR_HEADER)?;
    let implementation = ctx.read_optional(EDITOR_SOURCE)?;

    run_check(&mut report, "gui-bindings", || {
        let Some(implementation) = implementation.as_deref() else {
            return Ok(Outcome::skipped(format!("{EDITOR_SOURCE} not found")));
        };
        let bindings = ui::editor_bindings(header.as_deref().unwrap_or(""), implementation);
        Ok(reconcile::gui_parity(&ids, &bindings, EDITOR_SOURCE))
    })?;

    run_check(&mut report, "member-order", || {
        let Some(header) = header.as_deref() else {
            return Ok(Outcome::skipped(format!("{EDITOR_HEADER} not found")));
        };
        Ok(reconcile::declaration_order(
            &ui::declaration_lines(header),
            EDITOR_HEADER,
        ))
    })?;

    Ok(report)
}
