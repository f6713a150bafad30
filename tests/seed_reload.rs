//! Seed loader behaviour against the in-memory store.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use dealership_reviews::{
    CollectionOutcome, DealershipRepository, DocumentStore, Filter, InMemoryStore,
    ReviewRepository, SeedData, SeedFiles, SeedLoader, SortSpec, StoreError, StoreResult,
    DEALERSHIPS, REVIEWS,
};
use serde_json::{json, Value};

const REVIEWS_JSON: &str = r#"{"reviews": [
    {"id": 1, "name": "Berkly Shepley", "dealership": 15, "review": "Total grid-enabled service-desk",
     "purchase": true, "purchase_date": "07/11/2020", "car_make": "Audi", "car_model": "A6", "car_year": 2010},
    {"id": 2, "name": "Gwenora Zettoi", "dealership": 23, "review": "Future-proofed foreground capability",
     "purchase": true, "purchase_date": "09/17/2020", "car_make": "Pontiac", "car_model": "Firebird", "car_year": 1995},
    {"id": 3, "name": "Jaquelin Kiehl", "dealership": 15, "review": "Great", "purchase": false}
]}"#;

const DEALERSHIPS_JSON: &str = r#"{"dealerships": [
    {"id": 15, "city": "El Paso", "state": "Texas", "address": "3 Nova Court", "zip": "88563",
     "lat": "31.6948", "long": "-106.3", "short_name": "Holdlamis", "full_name": "Holdlamis Car Dealership"},
    {"id": 23, "city": "Minneapolis", "state": "Minnesota", "address": "6337 Butternut Crossing",
     "zip": "55402", "lat": "44.9762", "long": "-93.2759", "short_name": "Temp", "full_name": "Temp Car Dealership"}
]}"#;

fn seed_data() -> SeedData {
    SeedData::from_json_strs(REVIEWS_JSON, DEALERSHIPS_JSON).expect("seed fixtures parse")
}

fn ids(documents: &[Value]) -> HashSet<i64> {
    documents
        .iter()
        .filter_map(|doc| doc.get("id").and_then(Value::as_i64))
        .collect()
}

#[tokio::test]
async fn reload_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let loader = SeedLoader::new(store.clone());

    for _ in 0..3 {
        let report = loader.reload(seed_data()).await;
        assert!(report.is_complete());
    }

    assert_eq!(store.len(REVIEWS).unwrap(), 3);
    assert_eq!(store.len(DEALERSHIPS).unwrap(), 2);
    let reviews = store.find(REVIEWS, &Filter::all()).await.unwrap();
    assert_eq!(ids(&reviews), HashSet::from([1, 2, 3]));
}

#[tokio::test]
async fn reload_discards_documents_written_since_last_seed() {
    let store = Arc::new(InMemoryStore::new());
    let loader = SeedLoader::new(store.clone());
    loader.reload(seed_data()).await;

    let reviews = ReviewRepository::new(store.clone());
    let appended: dealership_reviews::NewReview = serde_json::from_value(serde_json::json!({
        "name": "A", "dealership": 15, "review": "ok", "purchase": false
    }))
    .unwrap();
    assert_eq!(reviews.append(appended).await.unwrap().id, 4);
    assert_eq!(store.len(REVIEWS).unwrap(), 4);

    loader.reload(seed_data()).await;
    assert_eq!(store.len(REVIEWS).unwrap(), 3);
}

#[tokio::test]
async fn empty_datasets_leave_empty_collections() {
    let store = Arc::new(InMemoryStore::new());
    let loader = SeedLoader::new(store.clone());
    loader.reload(seed_data()).await;

    let report = loader.reload(SeedData::default()).await;
    assert_eq!(report.reviews, CollectionOutcome::Loaded { count: 0 });
    assert_eq!(report.dealerships, CollectionOutcome::Loaded { count: 0 });
    assert!(store.is_empty(REVIEWS).unwrap());
    assert!(store.is_empty(DEALERSHIPS).unwrap());
}

#[tokio::test]
async fn seeded_documents_match_the_appended_shape() {
    let store = Arc::new(InMemoryStore::new());
    let data = SeedData::from_json_strs(
        r#"{"reviews": [{"id": 1, "name": "A", "dealership": "15", "review": "ok", "purchase": false}]}"#,
        r#"{"dealerships": [{"id": "15", "state": "Texas", "zip": "88563"}]}"#,
    )
    .unwrap();
    assert!(SeedLoader::new(store.clone()).reload(data).await.is_complete());

    let reviews = store.find(REVIEWS, &Filter::all()).await.unwrap();
    assert_eq!(
        reviews,
        vec![json!({
            "id": 1,
            "name": "A",
            "dealership": 15,
            "review": "ok",
            "purchase": false,
            "purchase_date": null,
            "car_make": null,
            "car_model": null,
            "car_year": null
        })]
    );

    let dealerships = store.find(DEALERSHIPS, &Filter::all()).await.unwrap();
    assert_eq!(dealerships, vec![json!({ "id": 15, "state": "Texas", "zip": "88563" })]);
}

#[tokio::test]
async fn reload_from_files_reads_both_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let reviews_path = dir.path().join("reviews.json");
    let dealerships_path = dir.path().join("dealerships.json");
    std::fs::File::create(&reviews_path)
        .unwrap()
        .write_all(REVIEWS_JSON.as_bytes())
        .unwrap();
    std::fs::File::create(&dealerships_path)
        .unwrap()
        .write_all(DEALERSHIPS_JSON.as_bytes())
        .unwrap();

    let store = Arc::new(InMemoryStore::new());
    let report = SeedLoader::new(store.clone())
        .reload_from_files(&SeedFiles {
            reviews: reviews_path,
            dealerships: dealerships_path,
        })
        .await;

    assert!(report.is_complete());
    let dealers = DealershipRepository::new(store.clone());
    let texas = dealers.list_by_state("Texas").await.unwrap();
    assert_eq!(texas.len(), 1);
    assert_eq!(texas[0].attributes["short_name"], "Holdlamis");
}

#[tokio::test]
async fn unreadable_file_fails_only_its_collection() {
    let dir = tempfile::tempdir().unwrap();
    let dealerships_path = dir.path().join("dealerships.json");
    std::fs::write(&dealerships_path, DEALERSHIPS_JSON).unwrap();

    let store = Arc::new(InMemoryStore::new());
    let report = SeedLoader::new(store.clone())
        .reload_from_files(&SeedFiles {
            reviews: dir.path().join("missing.json"),
            dealerships: dealerships_path,
        })
        .await;

    assert!(matches!(report.reviews, CollectionOutcome::Failed { .. }));
    assert_eq!(report.dealerships, CollectionOutcome::Loaded { count: 2 });
    assert_eq!(store.len(DEALERSHIPS).unwrap(), 2);
}

/// Store whose review collection is unreachable; dealerships work normally.
struct BrokenReviews {
    inner: InMemoryStore,
}

impl BrokenReviews {
    fn check(&self, collection: &str) -> StoreResult<()> {
        if collection == REVIEWS {
            Err(StoreError::backend("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for BrokenReviews {
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> StoreResult<usize> {
        self.check(collection)?;
        self.inner.insert_many(collection, documents).await
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.check(collection)?;
        self.inner.delete_many(collection, filter).await
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        self.check(collection)?;
        self.inner.find(collection, filter).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        self.check(collection)?;
        self.inner.find_one(collection, filter).await
    }

    async fn find_sorted(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>> {
        self.check(collection)?;
        self.inner.find_sorted(collection, filter, sort, limit).await
    }

    async fn insert_one(&self, collection: &str, document: Value) -> StoreResult<Value> {
        self.check(collection)?;
        self.inner.insert_one(collection, document).await
    }
}

#[tokio::test]
async fn store_failure_on_one_collection_does_not_block_the_other() {
    let store = Arc::new(BrokenReviews {
        inner: InMemoryStore::new(),
    });
    let report = SeedLoader::new(store.clone()).reload(seed_data()).await;

    match &report.reviews {
        CollectionOutcome::Failed { reason } => assert!(reason.contains("connection refused")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(report.dealerships, CollectionOutcome::Loaded { count: 2 });
    assert_eq!(store.inner.len(DEALERSHIPS).unwrap(), 2);
}
