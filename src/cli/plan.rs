//! Plan command implementation
//!
//! Fetches candidates, asks the optimizer for a route set and shows the
//! reconciled view. A failed optimizer call still shows the candidates.

use super::lookup::{candidate_source, fetch_candidates};
use super::output::{
    format_inputs_table, format_inventory, format_key_dates, format_routes_table,
    format_summary_table, format_view_table, format_warnings,
};
use super::PlanArgs;
use crate::candidate::inventory_total;
use crate::config::TrazoConfig;
use crate::optimizer::{
    delivery_date, flatten_inputs, DeliveryDate, HttpOptimizer, OptimizerError, OptimizerRequest,
    RecalculationData, RouteOptimizer, Weights,
};
use crate::reconcile::{AnnotatedView, ReconcileError};
use crate::session::Session;
use crate::warehouse::{CandidateQuery, CandidateSource};
use chrono::NaiveDate;
use colored::Colorize;
use serde_json::json;
use tracing::Instrument;

/// Everything one `plan` run produced.
#[derive(Debug)]
pub struct PlanOutcome {
    pub session: Session,
    pub view: AnnotatedView,
    /// Key fault that forced the candidate-only view.
    pub fault: Option<ReconcileError>,
    /// Optimizer failure; the view then has nothing selected.
    pub optimizer_error: Option<OptimizerError>,
}

/// Build the optimizer request from command-line arguments.
pub fn build_request(
    args: &PlanArgs,
    config: &TrazoConfig,
    purchase_date: NaiveDate,
) -> Result<OptimizerRequest, OptimizerError> {
    let request = OptimizerRequest::new(&args.sku, &args.cp, args.qty, args.flag_vn)?;

    if args.recalc {
        let (Some(original_delivery), Some(rejected_store)) =
            (args.original_delivery, args.rejected_store)
        else {
            return Err(OptimizerError::InvalidRequest(
                "recalculation needs --original-delivery and --rejected-store".to_string(),
            ));
        };
        let data = RecalculationData::new(purchase_date, original_delivery, rejected_store)?;
        return Ok(request
            .with_weights(Weights::recalculation(args.diferencia)?)
            .with_recalculation(data));
    }

    let preset = args.preset.unwrap_or(config.optimizer.default_preset);
    let mut weights = Weights::standard(preset);
    for (name, value) in &args.weights {
        weights.set(name, *value)?;
    }
    tracing::debug!(preset = %preset, weights = ?weights.classify(), "Resolved optimizer weights");

    Ok(request.with_weights(weights))
}

/// Run the fetch, optimize and reconcile pipeline.
///
/// A warehouse failure aborts the run. An optimizer failure is recorded in
/// the outcome and the candidates are shown without a selection.
pub async fn run_plan(
    source: &dyn CandidateSource,
    optimizer: &dyn RouteOptimizer,
    query: &CandidateQuery,
    request: &OptimizerRequest,
) -> Result<PlanOutcome, Box<dyn std::error::Error>> {
    let mut session = Session::new();
    session.replace_candidates(fetch_candidates(source, query).await?);

    let optimizer_error = match optimizer.optimize(request).await {
        Ok(result) => {
            tracing::info!(
                optimizer = optimizer.name(),
                routes = result.routes.len(),
                status = result.status_label(),
                "Optimizer returned"
            );
            session.replace_optimizer(result);
            None
        }
        Err(e) => {
            tracing::warn!(optimizer = optimizer.name(), error = %e, "Optimizer call failed");
            session.clear_optimizer();
            Some(e)
        }
    };

    let (view, fault) = session.view_or_unannotated()?;
    if let Some(ref fault) = fault {
        tracing::warn!(error = %fault, "Reconciliation failed, showing candidates only");
    }
    for warning in &view.warnings {
        tracing::warn!(%warning, "Reconciliation warning");
    }
    tracing::info!(
        rows = view.len(),
        selected = view.selected_count(),
        warnings = view.warnings.len(),
        "Reconciled snapshots"
    );

    Ok(PlanOutcome {
        session,
        view,
        fault,
        optimizer_error,
    })
}

/// Format a plan run as JSON or as tables.
pub fn render_plan(
    outcome: &PlanOutcome,
    request: &OptimizerRequest,
    purchase_date: NaiveDate,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let rejected_store = request.rejected_store();
    let candidates = outcome.session.candidates();
    let inventory = candidates.and_then(|c| inventory_total(c, rejected_store));
    let delivery = outcome
        .view
        .summary
        .as_ref()
        .and_then(|s| delivery_date(s, purchase_date));
    let inputs = outcome
        .session
        .optimizer()
        .map(|r| flatten_inputs(&r.inputs))
        .unwrap_or_default();
    let routes = outcome
        .session
        .optimizer()
        .map(|r| r.routes.as_slice())
        .unwrap_or_default();

    if json {
        let delivery_json = delivery.map(|d| match d {
            DeliveryDate::Reported(date) => json!({"date": date, "source": "reported"}),
            DeliveryDate::Estimated(date) => json!({"date": date, "source": "estimated"}),
        });
        let inputs_json: serde_json::Map<String, serde_json::Value> = inputs.into_iter().collect();
        return Ok(serde_json::to_string_pretty(&json!({
            "inventory": inventory,
            "rows": outcome.view.rows,
            "summary": outcome.view.summary,
            "warnings": outcome.view.warnings,
            "optimizer_routes": routes,
            "reconcile_error": outcome.fault.as_ref().map(|e| e.to_string()),
            "optimizer_error": outcome.optimizer_error.as_ref().map(|e| e.to_string()),
            "purchase_date": purchase_date,
            "delivery_date": delivery_json,
            "inputs": inputs_json,
        }))?);
    }

    let mut sections = vec![format_inventory(inventory)];
    sections.push(format_view_table(&outcome.view, rejected_store));
    sections.push(format!(
        "{} of {} candidate route(s) selected",
        outcome.view.selected_count(),
        outcome.view.len()
    ));

    if let Some(ref e) = outcome.optimizer_error {
        sections.push(format!("{} {}", "error:".red().bold(), e));
    }
    if let Some(ref fault) = outcome.fault {
        sections.push(format!(
            "{} {}; showing candidates without the optimizer selection",
            "error:".red().bold(),
            fault
        ));
    }
    if !outcome.view.warnings.is_empty() {
        sections.push(format_warnings(&outcome.view.warnings));
    }
    if !routes.is_empty() {
        sections.push(format_routes_table(routes, &outcome.view));
    }
    if let Some(ref summary) = outcome.view.summary {
        sections.push(format_summary_table(summary));
        sections.push(format_key_dates(
            purchase_date,
            request.data_recalculo.map(|d| d.fecha_entrega_original),
            delivery,
        ));
    }
    if !inputs.is_empty() {
        sections.push(format_inputs_table(&inputs));
    }

    Ok(sections.join("\n"))
}

/// Handle `trazo plan`
pub async fn handle_plan(args: &PlanArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = super::prepare(&args.common)?;
    let purchase_date = args
        .purchase_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let query = CandidateQuery::new(&args.sku, &args.cp)?;
    let request = build_request(args, &config, purchase_date)?;

    let client = reqwest::Client::new();
    let source = candidate_source(&config, args.candidates.as_deref(), client.clone());
    let optimizer = HttpOptimizer::from_config(&config.optimizer, client);

    let run_id = crate::logging::generate_run_id();
    let outcome = run_plan(source.as_ref(), &optimizer, &query, &request)
        .instrument(tracing::info_span!("plan", run_id = %run_id))
        .await?;

    render_plan(&outcome, &request, purchase_date, args.common.json)
}
