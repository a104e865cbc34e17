//! Output formatting helpers for CLI commands

use crate::candidate::{InventoryTotal, STORE_COLUMN};
use crate::optimizer::{DeliveryDate, ModelStatus, OptimizerRoute, OptimizerSummary};
use crate::reconcile::{AnnotatedRow, AnnotatedView, ReconcileWarning};
use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

/// Headers for the optimizer columns appended to selected rows.
const OPTIMIZER_HEADERS: [&str; 5] = ["Qty", "EDD", "Lead time", "Cost", "Store"];

/// How a row stands out in the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHighlight {
    /// Chosen by the optimizer.
    Selected,
    /// Served by the store that rejected the order.
    Rejected,
    None,
}

/// Highlight for one row; selection wins over rejection.
pub fn row_highlight(row: &AnnotatedRow, rejected_store: Option<i64>) -> RowHighlight {
    if row.selected {
        return RowHighlight::Selected;
    }
    let Some(rejected) = rejected_store else {
        return RowHighlight::None;
    };
    let store = row.fields.get(STORE_COLUMN).and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    if store == Some(rejected) {
        RowHighlight::Rejected
    } else {
        RowHighlight::None
    }
}

/// Render a warehouse value for a table cell. Null is blank.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn styled(text: String, highlight: RowHighlight) -> Cell {
    let cell = Cell::new(text);
    match highlight {
        RowHighlight::Selected => cell.fg(Color::Black).bg(Color::Yellow),
        RowHighlight::Rejected => cell.fg(Color::Red),
        RowHighlight::None => cell,
    }
}

fn view_columns(view: &AnnotatedView) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in &view.rows {
        for key in row.fields.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    columns
}

/// Format the merged candidate table.
///
/// Every candidate row appears in warehouse order. Selected rows carry a
/// marker and the optimizer's figures in the trailing columns.
pub fn format_view_table(view: &AnnotatedView, rejected_store: Option<i64>) -> String {
    let columns = view_columns(view);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![""];
    header.extend(columns.iter().copied());
    header.extend(OPTIMIZER_HEADERS);
    table.set_header(header);

    for row in &view.rows {
        let highlight = row_highlight(row, rejected_store);
        let marker = match highlight {
            RowHighlight::Selected => "✓",
            RowHighlight::Rejected => "✗",
            RowHighlight::None => "",
        };

        let mut cells = vec![styled(marker.to_string(), highlight)];
        for column in &columns {
            let text = row.fields.get(*column).map(format_value).unwrap_or_default();
            cells.push(styled(text, highlight));
        }

        let optimizer_cells: [String; 5] = match &row.optimizer_fields {
            Some(route) => [
                route.assigned_qty.to_string(),
                route.estimated_delivery_date.clone().unwrap_or_default(),
                format!("{}d", route.lead_time_days),
                format!("{:.2}", route.cost),
                route.store_id.to_string(),
            ],
            None => Default::default(),
        };
        cells.extend(optimizer_cells.into_iter().map(|t| styled(t, highlight)));

        table.add_row(cells);
    }

    table.to_string()
}

/// Model status as the service labelled it, colored by outcome.
pub fn status_str(summary: &OptimizerSummary) -> String {
    let label = summary.status_label.as_str();
    if label.is_empty() {
        return "-".to_string();
    }
    match summary.model_status {
        ModelStatus::Optimal => label.green().to_string(),
        ModelStatus::Infeasible => label.red().to_string(),
        ModelStatus::Other(_) => label.yellow().to_string(),
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format the optimizer summary as a two-column table.
pub fn format_summary_table(summary: &OptimizerSummary) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        Cell::new("Model status"),
        Cell::new(status_str(summary)),
    ]);
    table.add_row(vec![
        Cell::new("Routes used"),
        Cell::new(optional(summary.routes_used_count)),
    ]);
    table.add_row(vec![
        Cell::new("Max lead time (days)"),
        Cell::new(optional(summary.max_lead_time_days)),
    ]);
    table.add_row(vec![
        Cell::new("Total unit cost"),
        Cell::new(optional(summary.total_unit_cost.map(|c| format!("{:.2}", c)))),
    ]);
    table.add_row(vec![
        Cell::new("Processing time (s)"),
        Cell::new(optional(summary.total_processing_time.map(|t| format!("{:.3}", t)))),
    ]);
    for (key, value) in &summary.extra {
        table.add_row(vec![Cell::new(key), Cell::new(format_value(value))]);
    }

    table.to_string()
}

/// Format the routes the optimizer returned, in service order.
///
/// Routes with no candidate row are marked so their figures are not lost.
pub fn format_routes_table(routes: &[OptimizerRoute], view: &AnnotatedView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Route", "Qty", "EDD", "Lead time", "Cost", "Store", "Candidate"]);

    for route in routes {
        let matched = view.row(&route.route_key).is_some();
        let candidate = if matched {
            Cell::new("yes")
        } else {
            Cell::new("no").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&route.route_key),
            Cell::new(route.assigned_qty),
            Cell::new(route.estimated_delivery_date.as_deref().unwrap_or_default()),
            Cell::new(format!("{}d", route.lead_time_days)),
            Cell::new(format!("{:.2}", route.cost)),
            Cell::new(route.store_id),
            candidate,
        ]);
    }

    table.to_string()
}

/// Format the optimizer's flattened request echo.
pub fn format_inputs_table(inputs: &[(String, Value)]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Variable", "Value"]);

    for (name, value) in inputs {
        table.add_row(vec![Cell::new(name), Cell::new(format_value(value))]);
    }

    table.to_string()
}

/// Format the inventory headline above the candidate table.
pub fn format_inventory(total: Option<InventoryTotal>) -> String {
    match total {
        Some(InventoryTotal::PerStore {
            total,
            excluded_store: Some(store),
        }) => format!(
            "Inventory on hand: {} units (excluding store {})",
            total.to_string().bold(),
            store
        ),
        Some(total) => format!("Inventory on hand: {} units", total.total().to_string().bold()),
        None => "Inventory on hand: unavailable".dimmed().to_string(),
    }
}

/// Format purchase and delivery dates for a run.
pub fn format_key_dates(
    purchase_date: NaiveDate,
    original_delivery: Option<NaiveDate>,
    new_delivery: Option<DeliveryDate>,
) -> String {
    let mut lines = vec![format!("Purchase date:     {}", purchase_date)];
    if let Some(original) = original_delivery {
        lines.push(format!("Original delivery: {}", original));
    }
    let new_line = match new_delivery {
        Some(DeliveryDate::Reported(d)) => format!("{}", d.to_string().bold()),
        Some(DeliveryDate::Estimated(d)) => format!("{} (estimated)", d.to_string().bold()),
        None => "unknown".dimmed().to_string(),
    };
    lines.push(format!("New delivery:      {}", new_line));
    lines.join("\n")
}

/// Format reconciliation warnings, one per line.
pub fn format_warnings(warnings: &[ReconcileWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("{} {}", "warning:".yellow().bold(), w))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateSet, Fields};
    use crate::optimizer::OptimizerResult;
    use crate::reconcile::reconcile;
    use serde_json::json;

    fn candidates() -> CandidateSet {
        CandidateSet::from_values(
            vec![
                json!({"ID_TRAZO": "R1", "TDA_CVE": 108, "INVENTARIO_OH": 4}),
                json!({"ID_TRAZO": "R2", "TDA_CVE": 215, "INVENTARIO_OH": 7}),
                json!({"ID_TRAZO": "R3", "TDA_CVE": 108, "INVENTARIO_OH": 4}),
            ],
            "ID_TRAZO",
        )
        .unwrap()
    }

    fn optimizer() -> OptimizerResult {
        let mut summary = OptimizerSummary::with_status(ModelStatus::Optimal);
        summary.routes_used_count = Some(1);
        summary.total_unit_cost = Some(85.5);
        OptimizerResult::new(
            vec![OptimizerRoute {
                route_key: "R2".to_string(),
                assigned_qty: 2,
                estimated_delivery_date: Some("2025-06-05".to_string()),
                lead_time_days: 3,
                cost: 85.5,
                store_id: 215,
            }],
            summary,
        )
    }

    #[test]
    fn test_format_view_table_shows_all_rows() {
        let set = candidates();
        let view = reconcile(Some(&set), Some(&optimizer())).unwrap();
        let output = format_view_table(&view, None);

        assert!(output.contains("ID_TRAZO"));
        assert!(output.contains("R1"));
        assert!(output.contains("R3"));
        assert!(output.contains("2025-06-05"));
        assert!(output.contains("85.50"));
    }

    #[test]
    fn test_format_view_table_empty() {
        let view = AnnotatedView::unannotated(&CandidateSet::default());
        let output = format_view_table(&view, None);
        assert!(output.contains("Lead time")); // Header present
    }

    #[test]
    fn test_row_highlight_priority() {
        let set = candidates();
        let view = reconcile(Some(&set), Some(&optimizer())).unwrap();

        assert_eq!(row_highlight(&view.rows[0], Some(108)), RowHighlight::Rejected);
        assert_eq!(row_highlight(&view.rows[1], Some(215)), RowHighlight::Selected);
        assert_eq!(row_highlight(&view.rows[2], None), RowHighlight::None);
    }

    #[test]
    fn test_row_highlight_store_as_text() {
        let mut fields = Fields::new();
        fields.insert("TDA_CVE".to_string(), json!("108"));
        let row = AnnotatedRow {
            route_key: "R9".to_string(),
            fields,
            selected: false,
            optimizer_fields: None,
        };
        assert_eq!(row_highlight(&row, Some(108)), RowHighlight::Rejected);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&json!("MTY")), "MTY");
        assert_eq!(format_value(&json!(12.5)), "12.5");
        assert_eq!(format_value(&json!(true)), "true");
    }

    #[test]
    fn test_format_summary_table() {
        let mut summary = optimizer().summary.unwrap();
        summary.extra.insert("fecha_de_entrega".to_string(), json!("2025-06-05"));
        let output = format_summary_table(&summary);

        assert!(output.contains("Optimal"));
        assert!(output.contains("85.50"));
        assert!(output.contains("fecha_de_entrega"));
    }

    #[test]
    fn test_format_summary_table_keeps_status_label() {
        colored::control::set_override(false);
        let mut summary = OptimizerSummary::with_status(ModelStatus::from("optimal"));
        summary.status_label = "optimal".to_string();
        summary.extra.insert("suma_costo_unitario".to_string(), json!("55.00"));
        let output = format_summary_table(&summary);

        assert!(output.contains("optimal"));
        assert!(!output.contains("Optimal"));
        assert!(output.contains("55.00"));
    }

    #[test]
    fn test_format_routes_table_marks_unmatched() {
        let set = candidates();
        let mut result = optimizer();
        result.routes.push(OptimizerRoute {
            route_key: "R404".to_string(),
            assigned_qty: 7,
            estimated_delivery_date: None,
            lead_time_days: 9,
            cost: 12.25,
            store_id: 990,
        });
        let view = reconcile(Some(&set), Some(&result)).unwrap();
        let output = format_routes_table(&result.routes, &view);

        assert!(output.contains("R2"));
        assert!(output.contains("R404"));
        assert!(output.contains("12.25"));
        assert!(output.contains("990"));
        assert!(output.contains("no"));
        assert!(!output.contains("R1"));
    }

    #[test]
    fn test_format_summary_table_infeasible() {
        let output = format_summary_table(&OptimizerSummary::with_status(ModelStatus::Infeasible));
        assert!(output.contains("Infeasible"));
        assert!(output.contains("-"));
    }

    #[test]
    fn test_format_inputs_table() {
        let inputs = vec![
            ("sku".to_string(), json!("1139002876")),
            ("weights.costo".to_string(), json!(2.0)),
        ];
        let output = format_inputs_table(&inputs);
        assert!(output.contains("weights.costo"));
        assert!(output.contains("1139002876"));
    }

    #[test]
    fn test_format_inventory_variants() {
        colored::control::set_override(false);
        assert_eq!(
            format_inventory(Some(InventoryTotal::PerStore {
                total: 11,
                excluded_store: Some(108)
            })),
            "Inventory on hand: 11 units (excluding store 108)"
        );
        assert_eq!(
            format_inventory(Some(InventoryTotal::Raw { total: 5 })),
            "Inventory on hand: 5 units"
        );
        assert!(format_inventory(None).contains("unavailable"));
    }

    #[test]
    fn test_format_key_dates() {
        colored::control::set_override(false);
        let purchase = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let estimated = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let output = format_key_dates(purchase, None, Some(DeliveryDate::Estimated(estimated)));

        assert!(output.contains("2025-06-02"));
        assert!(output.contains("2025-06-05 (estimated)"));
        assert!(!output.contains("Original delivery"));
    }

    #[test]
    fn test_format_warnings() {
        let warnings = vec![ReconcileWarning::UnmatchedOptimizerRoute {
            route_key: "R404".to_string(),
        }];
        let output = format_warnings(&warnings);
        assert!(output.contains("R404"));
        assert!(format_warnings(&[]).is_empty());
    }
}
