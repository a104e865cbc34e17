//! Lookup command implementation

use super::output::{format_inventory, format_view_table};
use super::LookupArgs;
use crate::candidate::{inventory_total, CandidateSet};
use crate::config::TrazoConfig;
use crate::reconcile::AnnotatedView;
use crate::warehouse::{BigQuerySource, CandidateQuery, CandidateSource, SnapshotSource};
use serde_json::json;
use std::path::Path;
use tracing::Instrument;

/// Pick the candidate source: a saved export if given, else the warehouse.
pub fn candidate_source(
    config: &TrazoConfig,
    snapshot: Option<&Path>,
    client: reqwest::Client,
) -> Box<dyn CandidateSource> {
    match snapshot {
        Some(path) => Box::new(SnapshotSource::new(
            path,
            config.warehouse.route_key_column.clone(),
        )),
        None => Box::new(BigQuerySource::from_config(&config.warehouse, client)),
    }
}

/// Fetch candidates for a query.
pub async fn fetch_candidates(
    source: &dyn CandidateSource,
    query: &CandidateQuery,
) -> Result<CandidateSet, Box<dyn std::error::Error>> {
    let set = source.fetch(query).await?;
    tracing::info!(
        source = source.name(),
        rows = set.len(),
        "Fetched candidate routes"
    );
    Ok(set)
}

/// Format a candidate set on its own, as JSON or as a table.
pub fn render_lookup(set: &CandidateSet, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    let inventory = inventory_total(set, None);

    if json {
        let rows: Vec<_> = set.iter().map(|r| &r.fields).collect();
        return Ok(serde_json::to_string_pretty(&json!({
            "inventory": inventory,
            "rows": rows,
        }))?);
    }

    if set.is_empty() {
        return Ok("No candidate routes found.".to_string());
    }

    Ok(format!(
        "{}\n{}\n{} candidate route(s)",
        format_inventory(inventory),
        format_view_table(&AnnotatedView::unannotated(set), None),
        set.len()
    ))
}

/// Handle `trazo lookup`
pub async fn handle_lookup(args: &LookupArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = super::prepare(&args.common)?;
    let query = CandidateQuery::new(&args.sku, &args.cp)?;
    let source = candidate_source(&config, args.candidates.as_deref(), reqwest::Client::new());

    let run_id = crate::logging::generate_run_id();
    let set = fetch_candidates(source.as_ref(), &query)
        .instrument(tracing::info_span!("lookup", run_id = %run_id))
        .await?;

    render_lookup(&set, args.common.json)
}
