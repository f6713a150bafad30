use super::{decode, decode_all};
use crate::model::{fields, DealerId, NewReview, Review};
use crate::store::{DocumentStore, Filter, SortSpec, StoreResult};
use crate::REVIEWS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How [`ReviewRepository::append`] protects its max-then-insert sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdAllocation {
    /// Appends queue behind a per-repository lock, so ids stay unique for
    /// every writer sharing this repository.
    #[default]
    Serialized,
    /// Read the current maximum and insert with no coordination. Concurrent
    /// appends can observe the same maximum and persist duplicate ids.
    MaxPlusOne,
}

/// Queries and appends over the `reviews` collection.
pub struct ReviewRepository {
    store: Arc<dyn DocumentStore>,
    allocation: IdAllocation,
    append_lock: Mutex<()>,
}

impl ReviewRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_allocation(store, IdAllocation::default())
    }

    pub fn with_allocation(store: Arc<dyn DocumentStore>, allocation: IdAllocation) -> Self {
        Self {
            store,
            allocation,
            append_lock: Mutex::new(()),
        }
    }

    pub fn allocation(&self) -> IdAllocation {
        self.allocation
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Review>> {
        let documents = self.store.find(REVIEWS, &Filter::all()).await?;
        decode_all(REVIEWS, documents)
    }

    /// Reviews whose `dealership` equals `dealer`. The dealer does not have to exist.
    pub async fn list_by_dealer(&self, dealer: &DealerId) -> StoreResult<Vec<Review>> {
        let documents = self
            .store
            .find(REVIEWS, &Filter::eq(fields::DEALERSHIP, dealer))
            .await?;
        decode_all(REVIEWS, documents)
    }

    /// Persist `candidate` under the next sequential id and return the stored review.
    pub async fn append(&self, candidate: NewReview) -> StoreResult<Review> {
        let _guard = match self.allocation {
            IdAllocation::Serialized => Some(self.append_lock.lock().await),
            IdAllocation::MaxPlusOne => None,
        };

        let id = self.next_id().await?;
        let document = serde_json::to_value(candidate.into_review(id))?;
        let stored = self.store.insert_one(REVIEWS, document).await?;
        tracing::debug!(review_id = id, "Review appended");
        decode(REVIEWS, stored)
    }

    /// One past the largest `id` in the collection, or 1 when it is empty.
    async fn next_id(&self) -> StoreResult<i64> {
        let top = self
            .store
            .find_sorted(
                REVIEWS,
                &Filter::all(),
                &SortSpec::descending(fields::ID),
                Some(1),
            )
            .await?;

        Ok(top
            .first()
            .and_then(|doc| doc.get(fields::ID))
            .and_then(Value::as_i64)
            .map_or(1, |max| max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn candidate(dealer: DealerId, name: &str) -> NewReview {
        NewReview {
            name: name.to_string(),
            dealership: dealer,
            review: "ok".to_string(),
            purchase: false,
            purchase_date: None,
            car_make: None,
            car_model: None,
            car_year: None,
        }
    }

    #[tokio::test]
    async fn sequential_appends_count_up_from_one() {
        let repo = ReviewRepository::new(Arc::new(InMemoryStore::new()));
        for expected in 1..=5 {
            let review = repo.append(candidate("1".into(), "A")).await.unwrap();
            assert_eq!(review.id, expected);
        }
    }

    #[tokio::test]
    async fn append_continues_after_existing_maximum() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_many(
                REVIEWS,
                vec![
                    json!({ "id": 4, "name": "x", "dealership": 1, "review": "r", "purchase": true }),
                    json!({ "id": 41, "name": "y", "dealership": 2, "review": "r", "purchase": false }),
                ],
            )
            .await
            .unwrap();

        let repo = ReviewRepository::with_allocation(store, IdAllocation::MaxPlusOne);
        let review = repo.append(candidate(DealerId::Number(2), "B")).await.unwrap();
        assert_eq!(review.id, 42);
    }

    #[tokio::test]
    async fn list_by_dealer_sees_new_review_only_for_its_dealer() {
        let repo = ReviewRepository::new(Arc::new(InMemoryStore::new()));
        repo.append(candidate(DealerId::Number(7), "A")).await.unwrap();

        assert_eq!(repo.list_by_dealer(&DealerId::Number(7)).await.unwrap().len(), 1);
        assert!(repo.list_by_dealer(&DealerId::Number(8)).await.unwrap().is_empty());
        assert!(repo.list_by_dealer(&DealerId::from("seven")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn numeric_string_dealer_is_stored_as_number() {
        let repo = ReviewRepository::new(Arc::new(InMemoryStore::new()));
        let candidate: NewReview = serde_json::from_value(json!({
            "name": "A", "dealership": "1", "review": "ok", "purchase": false
        }))
        .unwrap();
        let review = repo.append(candidate).await.unwrap();
        assert_eq!(review.dealership, DealerId::Number(1));

        let listed = repo.list_by_dealer(&DealerId::from_path("1")).await.unwrap();
        assert_eq!(listed, vec![review]);
    }

    #[tokio::test]
    async fn dangling_dealer_references_are_kept() {
        let repo = ReviewRepository::new(Arc::new(InMemoryStore::new()));
        let review = repo.append(candidate(DealerId::Number(999), "A")).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap(), vec![review]);
    }
}
