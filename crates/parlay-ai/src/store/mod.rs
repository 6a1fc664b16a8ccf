//! Read-only access to the tabular store holding open propositions and past outcomes.

pub mod memory;
pub mod rest;
pub mod snapshot;

use serde_json::{Map, Value};

pub use memory::InMemoryStore;
pub use rest::RestStore;
pub use snapshot::SnapshotError;

/// A single row as returned by the store.
pub type Row = Map<String, Value>;

/// Equality predicate applied by the store before rows are returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// Select/filter/order/limit description of one store read.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl TableQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Storage abstraction so the recommendation service can run against a fake in tests.
pub trait RecordStore: Send + Sync {
    fn execute(&self, query: &TableQuery) -> Result<Vec<Row>, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn execute(&self, query: &TableQuery) -> Result<Vec<Row>, StoreError> {
        (**self).execute(query)
    }
}

/// Failure reported by a store. Never interpreted as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store not configured: {0}")]
    NotConfigured(String),
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("query on '{table}' failed: {message}")]
    Query { table: String, message: String },
}

impl StoreError {
    /// True for errors caused by missing or unreachable store configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, StoreError::NotConfigured(_) | StoreError::Unreachable(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotConfigured(_) => "not_configured",
            StoreError::Unreachable(_) => "unreachable",
            StoreError::Query { .. } => "query",
        }
    }
}
