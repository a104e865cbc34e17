//! Reconcile command implementation
//!
//! Merges a saved candidate export with a saved optimizer response, without
//! calling either service. A saved error body or an unreadable response still
//! shows the candidates.

use super::output::{
    format_inventory, format_routes_table, format_summary_table, format_view_table,
    format_warnings,
};
use super::ReconcileArgs;
use crate::candidate::{inventory_total, CandidateSet};
use crate::optimizer::load_optimizer_file;
use crate::session::Session;
use colored::Colorize;
use serde_json::json;

/// Handle `trazo reconcile`
pub fn handle_reconcile(args: &ReconcileArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = super::prepare(&args.common)?;
    let key_column = args
        .key_column
        .as_deref()
        .unwrap_or(&config.warehouse.route_key_column);

    let mut session = Session::new();
    session.replace_candidates(CandidateSet::load(&args.candidates, key_column)?);
    let optimizer_error = match args.optimizer.as_deref().map(load_optimizer_file) {
        Some(Ok(result)) => {
            session.replace_optimizer(result);
            None
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Saved optimizer response not usable");
            session.clear_optimizer();
            Some(e)
        }
        None => None,
    };

    let (view, fault) = session.view_or_unannotated()?;
    if let Some(ref fault) = fault {
        tracing::warn!(error = %fault, "Reconciliation failed, showing candidates only");
    }
    tracing::info!(
        rows = view.len(),
        selected = view.selected_count(),
        warnings = view.warnings.len(),
        "Reconciled snapshots"
    );

    let inventory = session
        .candidates()
        .and_then(|c| inventory_total(c, args.rejected_store));
    let routes = session
        .optimizer()
        .map(|r| r.routes.as_slice())
        .unwrap_or_default();

    if args.common.json {
        return Ok(serde_json::to_string_pretty(&json!({
            "inventory": inventory,
            "rows": view.rows,
            "summary": view.summary,
            "warnings": view.warnings,
            "optimizer_routes": routes,
            "reconcile_error": fault.as_ref().map(|e| e.to_string()),
            "optimizer_error": optimizer_error.as_ref().map(|e| e.to_string()),
        }))?);
    }

    let mut sections = vec![
        format_inventory(inventory),
        format_view_table(&view, args.rejected_store),
        format!(
            "{} of {} candidate route(s) selected",
            view.selected_count(),
            view.len()
        ),
    ];
    if let Some(ref e) = optimizer_error {
        sections.push(format!("{} {}", "error:".red().bold(), e));
    }
    if let Some(ref fault) = fault {
        sections.push(format!(
            "{} {}; showing candidates without the optimizer selection",
            "error:".red().bold(),
            fault
        ));
    }
    if !view.warnings.is_empty() {
        sections.push(format_warnings(&view.warnings));
    }
    if !routes.is_empty() {
        sections.push(format_routes_table(routes, &view));
    }
    if let Some(ref summary) = view.summary {
        sections.push(format_summary_table(summary));
    }

    Ok(sections.join("\n"))
}
