use super::{DocumentStore, Filter, SortOrder, SortSpec, StoreError, StoreResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;

/// MongoDB backend.
///
/// Documents cross the boundary as relaxed extended JSON, so integers stay
/// integers. The native `_id` is stripped from everything returned.
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to `uri` and select the logical database `database`.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::backend(format!("connect to {uri}: {e}")))?;
        tracing::info!(database, "MongoDB client created");
        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn to_document(collection: &str, value: &Value) -> StoreResult<Document> {
    if !value.is_object() {
        return Err(StoreError::invalid_document(
            collection,
            "document must be a JSON object",
        ));
    }
    bson::to_document(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_document(mut document: Document) -> Value {
    document.remove("_id");
    Bson::Document(document).into_relaxed_extjson()
}

fn filter_document(filter: &Filter) -> StoreResult<Document> {
    let mut document = Document::new();
    for (field, value) in filter.clauses() {
        let value = bson::to_bson(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        document.insert(field.clone(), value);
    }
    Ok(document)
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> StoreResult<usize> {
        // The driver rejects an empty batch; an empty dataset is a valid no-op here.
        if documents.is_empty() {
            return Ok(0);
        }
        let documents = documents
            .iter()
            .map(|doc| to_document(collection, doc))
            .collect::<StoreResult<Vec<_>>>()?;
        let result = self
            .collection(collection)
            .insert_many(documents, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(result.inserted_ids.len())
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter_document(filter)?, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(result.deleted_count)
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let cursor = self
            .collection(collection)
            .find(filter_document(filter)?, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(documents.into_iter().map(from_document).collect())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let document = self
            .collection(collection)
            .find_one(filter_document(filter)?, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(document.map(from_document))
    }

    async fn find_sorted(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>> {
        let direction = match sort.order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        let mut sort_document = Document::new();
        sort_document.insert(sort.field.clone(), direction);

        let mut options = FindOptions::default();
        options.sort = Some(sort_document);
        options.limit = limit.map(|n| n as i64);

        let cursor = self
            .collection(collection)
            .find(filter_document(filter)?, options)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(documents.into_iter().map(from_document).collect())
    }

    async fn insert_one(&self, collection: &str, document: Value) -> StoreResult<Value> {
        let bson_document = to_document(collection, &document)?;
        self.collection(collection)
            .insert_one(bson_document, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(document)
    }
}
