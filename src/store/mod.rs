//! Document store abstraction.
//!
//! The repositories only depend on the [`DocumentStore`] contract: a set of
//! named collections of JSON object documents with insert, delete, and
//! equality-filtered find primitives. Backends:
//!
//! - [`InMemoryStore`]: a `RwLock`ed map of collections, used by tests and for
//!   running without a database.
//! - [`MongoStore`]: the MongoDB driver (enabled via the `mongo` feature).

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by a document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid document in `{collection}`: {reason}")]
    InvalidDocument { collection: String, reason: String },
    #[error("Store backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }

    pub fn invalid_document(collection: &str, reason: impl ToString) -> Self {
        StoreError::InvalidDocument {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Conjunction of `field == value` clauses. The empty filter matches every document.
///
/// Comparison is plain JSON equality, so `1` and `"1"` are different values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Filter matching all documents.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Single-field sort used by [`DocumentStore::find_sorted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// Compare two documents on the sort field, honouring the sort order.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Cross-type ordering modelled on MongoDB's BSON comparison order:
/// missing/null < numbers < strings < objects < arrays < booleans.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Object(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Contract every document store backend fulfils.
///
/// Documents are JSON objects. The store's own native identity (for example
/// MongoDB's `_id`) never appears in returned documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a batch of documents, returning how many were written.
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> StoreResult<usize>;

    /// Delete every document matching `filter`, returning how many were removed.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// All documents matching `filter`, in the store's stable order.
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// The first document matching `filter`, if any.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    /// Documents matching `filter`, sorted on one field and optionally truncated.
    async fn find_sorted(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>>;

    /// Insert a single document and return it as stored.
    async fn insert_one(&self, collection: &str, document: Value) -> StoreResult<Value>;
}

/// Selects and builds a store backend.
///
/// ```
/// use dealership_reviews::StoreConfig;
///
/// let config = StoreConfig::in_memory();
/// let mongo = StoreConfig::mongo("mongodb://mongo_db:27017/", "dealershipsDB");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StoreConfig {
    #[default]
    InMemory,
    /// MongoDB at `uri`, using the logical database `database`.
    ///
    /// Requires the `mongo` feature (enabled by default).
    Mongo { uri: String, database: String },
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn mongo(uri: impl Into<String>, database: impl Into<String>) -> Self {
        StoreConfig::Mongo {
            uri: uri.into(),
            database: database.into(),
        }
    }

    /// Build the configured backend. Connecting to MongoDB is asynchronous,
    /// hence so is this.
    pub async fn build(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
            StoreConfig::Mongo { uri, database } => {
                #[cfg(feature = "mongo")]
                {
                    Ok(Arc::new(MongoStore::connect(uri, database).await?))
                }
                #[cfg(not(feature = "mongo"))]
                {
                    let _ = (uri, database);
                    Err(StoreError::Unavailable(
                        "mongo backend disabled at compile time".into(),
                    ))
                }
            }
        }
    }
}
