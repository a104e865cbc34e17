//! BigQuery REST candidate source.
//!
//! Runs the candidate query through `jobs.query` and follows `pageToken`
//! through `jobs.getQueryResults` until every row is read. Cells arrive as
//! strings and are typed back using the result schema.

use super::{CandidateQuery, CandidateSource, TableRef, WarehouseError};
use crate::candidate::{CandidateSet, Fields};
use crate::config::WarehouseConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Number, Value};
use std::time::Duration;

/// BigQuery `jobs.query` / `jobs.getQueryResults` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
struct SchemaField {
    name: String,
    #[serde(rename = "type", default)]
    field_type: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: Value,
}

/// Type a raw cell according to its schema type.
///
/// Unparseable scalars and non-scalar cells are kept as sent.
fn decode_cell(field_type: &str, raw: Value) -> Value {
    let Value::String(text) = raw else {
        return raw;
    };

    match field_type {
        "INTEGER" | "INT64" => text.parse::<i64>().map(Value::from).unwrap_or(Value::String(text)),
        "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(text)),
        "BOOLEAN" | "BOOL" => match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        _ => Value::String(text),
    }
}

fn decode_rows(schema: &[SchemaField], rows: Vec<TableRow>) -> Result<Vec<Fields>, WarehouseError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            if row.f.len() != schema.len() {
                return Err(WarehouseError::InvalidResponse(format!(
                    "row {} has {} cells but schema has {} fields",
                    i,
                    row.f.len(),
                    schema.len()
                )));
            }
            Ok(schema
                .iter()
                .zip(row.f)
                .map(|(field, cell)| (field.name.clone(), decode_cell(&field.field_type, cell.v)))
                .collect())
        })
        .collect()
}

/// Candidate source backed by a BigQuery table.
pub struct BigQuerySource {
    base_url: String,
    table: TableRef,
    route_key_column: String,
    timeout: Duration,
    client: Client,
}

impl BigQuerySource {
    pub fn new(
        base_url: impl Into<String>,
        table: TableRef,
        route_key_column: impl Into<String>,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table,
            route_key_column: route_key_column.into(),
            timeout,
            client,
        }
    }

    pub fn from_config(config: &WarehouseConfig, client: Client) -> Self {
        Self::new(
            config.base_url.clone(),
            TableRef::from_config(config),
            config.route_key_column.clone(),
            Duration::from_secs(config.timeout_secs),
            client,
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> WarehouseError {
        if e.is_timeout() {
            WarehouseError::Timeout(self.timeout.as_millis() as u64)
        } else {
            WarehouseError::Network(e.to_string())
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<QueryResponse, WarehouseError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            WarehouseError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(WarehouseError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            WarehouseError::InvalidResponse(format!("Failed to parse query response: {}", e))
        })
    }

    async fn next_page(
        &self,
        job: &JobReference,
        page_token: &str,
    ) -> Result<QueryResponse, WarehouseError> {
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.base_url, self.table.project_id, job.job_id
        );
        let mut params = vec![("pageToken", page_token.to_string())];
        if let Some(location) = &job.location {
            params.push(("location", location.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::read_response(response).await
    }
}

#[async_trait]
impl CandidateSource for BigQuerySource {
    fn name(&self) -> &str {
        "bigquery"
    }

    async fn fetch(&self, query: &CandidateQuery) -> Result<CandidateSet, WarehouseError> {
        let url = format!("{}/projects/{}/queries", self.base_url, self.table.project_id);
        let sql = query.to_sql(&self.table);

        tracing::info!(
            sku = %query.sku(),
            cp = %query.cp(),
            table = %self.table,
            "Querying warehouse"
        );
        tracing::debug!(sql = %sql, "Warehouse query text");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "query": sql,
                "useLegacySql": false,
                "timeoutMs": self.timeout.as_millis() as u64,
            }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let mut page = Self::read_response(response).await?;
        if !page.job_complete {
            return Err(WarehouseError::Incomplete {
                job_id: page
                    .job_reference
                    .map(|j| j.job_id)
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let schema = page.schema.take().map(|s| s.fields).unwrap_or_default();
        let job = page.job_reference.take();
        let mut records = decode_rows(&schema, std::mem::take(&mut page.rows))?;

        let mut page_token = page.page_token.take();
        while let Some(token) = page_token {
            let job = job.as_ref().ok_or_else(|| {
                WarehouseError::InvalidResponse("pageToken without jobReference".to_string())
            })?;
            let mut next = self.next_page(job, &token).await?;
            records.extend(decode_rows(&schema, std::mem::take(&mut next.rows))?);
            page_token = next.page_token.take();
        }

        let set = CandidateSet::from_records(records, &self.route_key_column)?;
        tracing::info!(rows = set.len(), "Warehouse returned candidates");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_cell_types() {
        assert_eq!(decode_cell("INTEGER", json!("52715")), json!(52715));
        assert_eq!(decode_cell("FLOAT64", json!("1.5")), json!(1.5));
        assert_eq!(decode_cell("BOOLEAN", json!("true")), json!(true));
        assert_eq!(decode_cell("STRING", json!("R1")), json!("R1"));
        assert_eq!(decode_cell("INTEGER", Value::Null), Value::Null);
        assert_eq!(decode_cell("INTEGER", json!("n/a")), json!("n/a"));
    }

    #[test]
    fn test_decode_rows_keeps_schema_order() {
        let schema = vec![
            SchemaField {
                name: "ID_TRAZO".to_string(),
                field_type: "STRING".to_string(),
            },
            SchemaField {
                name: "CP".to_string(),
                field_type: "INTEGER".to_string(),
            },
        ];
        let rows = vec![TableRow {
            f: vec![TableCell { v: json!("R1") }, TableCell { v: json!("52715") }],
        }];

        let records = decode_rows(&schema, rows).unwrap();
        let keys: Vec<&str> = records[0].keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["ID_TRAZO", "CP"]);
        assert_eq!(records[0]["CP"], json!(52715));
    }

    #[test]
    fn test_decode_rows_rejects_ragged_row() {
        let schema = vec![SchemaField {
            name: "ID_TRAZO".to_string(),
            field_type: "STRING".to_string(),
        }];
        let rows = vec![TableRow { f: vec![] }];
        assert!(matches!(
            decode_rows(&schema, rows),
            Err(WarehouseError::InvalidResponse(_))
        ));
    }
}
