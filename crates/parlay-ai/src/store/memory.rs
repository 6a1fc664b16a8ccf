use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::{RecordStore, Row, StoreError, TableQuery};

/// Process-local store used by tests, the demo command, and CSV snapshot mode.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Row>>>>,
    failures: Arc<Mutex<HashMap<String, StoreError>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: impl Into<String>, rows: Vec<Row>) -> Self {
        self.replace_table(table, rows);
        self
    }

    pub fn replace_table(&self, table: impl Into<String>, rows: Vec<Row>) {
        lock(&self.tables).insert(table.into(), rows);
    }

    /// Makes every subsequent query against `table` fail with `error`.
    pub fn fail_table(&self, table: impl Into<String>, error: StoreError) {
        lock(&self.failures).insert(table.into(), error);
    }
}

impl RecordStore for InMemoryStore {
    fn execute(&self, query: &TableQuery) -> Result<Vec<Row>, StoreError> {
        if let Some(error) = lock(&self.failures).get(&query.table) {
            return Err(error.clone());
        }

        let tables = lock(&self.tables);
        let mut rows: Vec<Row> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query.filters.iter().all(|filter| {
                            row.get(&filter.column)
                                .map(|value| value_text(value) == filter.value)
                                .unwrap_or(false)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// Nulls and missing values sort before everything else.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Less,
        (_, Some(Value::Null) | None) => Ordering::Greater,
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}
