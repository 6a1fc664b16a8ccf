use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use super::{RecordStore, Row, StoreError, TableQuery};
use crate::config::StoreConfig;

/// PostgREST (Supabase) backed store.
///
/// The HTTP client is created on the first query and reused for the lifetime of the store.
/// Requests are blocking and single-shot; callers on an async runtime should dispatch through
/// `spawn_blocking`.
pub struct RestStore {
    base_url: Option<String>,
    service_key: Option<String>,
    client: OnceLock<Client>,
}

impl RestStore {
    pub fn new(base_url: Option<String>, service_key: Option<String>) -> Self {
        Self {
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            service_key,
            client: OnceLock::new(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.url.clone(), config.service_key.clone())
    }

    fn credentials(&self) -> Result<(&str, &str), StoreError> {
        match (self.base_url.as_deref(), self.service_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Ok((url, key)),
            _ => Err(StoreError::NotConfigured(
                "SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY not set".to_string(),
            )),
        }
    }

    fn client(&self) -> Result<&Client, StoreError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let built = build_client()?;
        // A concurrent initializer may have won; its client is kept and ours is dropped.
        let _ = self.client.set(built);
        self.client
            .get()
            .ok_or_else(|| StoreError::Unreachable("http client unavailable".to_string()))
    }
}

// No request timeout: a stalled store stalls the caller, and cancellation is left to the
// serving layer.
fn build_client() -> Result<Client, StoreError> {
    Client::builder()
        .timeout(None::<Duration>)
        .build()
        .map_err(|err| StoreError::Unreachable(err.to_string()))
}

impl RecordStore for RestStore {
    fn execute(&self, query: &TableQuery) -> Result<Vec<Row>, StoreError> {
        let (base_url, key) = self.credentials()?;
        let client = self.client()?;

        let url = format!("{base_url}/rest/v1/{}", query.table);
        let params = query_params(query);
        debug!(table = %query.table, ?params, "executing store query");

        let response = client
            .get(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .query(&params)
            .send()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Query {
                table: query.table.clone(),
                message: body,
            });
        }

        parse_rows(&query.table, &body)
    }
}

pub(crate) fn query_params(query: &TableQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.clone())];
    for filter in &query.filters {
        params.push((filter.column.clone(), format!("eq.{}", filter.value)));
    }
    if let Some(order) = &query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

pub(crate) fn parse_rows(table: &str, body: &str) -> Result<Vec<Row>, StoreError> {
    let payload: Value = serde_json::from_str(body).map_err(|err| StoreError::Query {
        table: table.to_string(),
        message: format!("invalid response body: {err}"),
    })?;

    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect()),
        other => Err(StoreError::Query {
            table: table.to_string(),
            message: format!("expected an array of rows, got {other}"),
        }),
    }
}
