use super::{DocumentStore, Filter, SortSpec, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An in-memory store using a `RwLock` around a map of collections.
///
/// Each collection keeps documents in insertion order, which is the stable
/// order returned by `find`. No lock is held across an `.await`.
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents currently in `collection`.
    pub fn len(&self, collection: &str) -> StoreResult<usize> {
        Ok(self.read()?.get(collection).map_or(0, Vec::len))
    }

    pub fn is_empty(&self, collection: &str) -> StoreResult<bool> {
        self.len(collection).map(|count| count == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_object(collection: &str, document: &Value) -> StoreResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::invalid_document(
            collection,
            "document must be a JSON object",
        ))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> StoreResult<usize> {
        for document in &documents {
            ensure_object(collection, document)?;
        }
        let count = documents.len();
        // One write lock for the whole batch.
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(count)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut guard = self.write()?;
        let Some(documents) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|doc| !filter.matches(doc));
        Ok((before - documents.len()) as u64)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_sorted(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>> {
        let mut documents = self.find(collection, filter).await?;
        // Stable sort keeps insertion order among equal keys.
        documents.sort_by(|a, b| sort.compare(a, b));
        if let Some(limit) = limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn insert_one(&self, collection: &str, document: Value) -> StoreResult<Value> {
        ensure_object(collection, &document)?;
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }
}
