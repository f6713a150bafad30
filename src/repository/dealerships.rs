use super::{decode, decode_all};
use crate::model::{fields, DealerId, Dealership};
use crate::store::{DocumentStore, Filter, StoreResult};
use crate::DEALERSHIPS;
use std::sync::Arc;

/// Read-only queries over the `dealerships` collection.
#[derive(Clone)]
pub struct DealershipRepository {
    store: Arc<dyn DocumentStore>,
}

impl DealershipRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Dealership>> {
        let documents = self.store.find(DEALERSHIPS, &Filter::all()).await?;
        decode_all(DEALERSHIPS, documents)
    }

    /// Dealerships whose `state` matches exactly. No match is an empty list.
    pub async fn list_by_state(&self, state: &str) -> StoreResult<Vec<Dealership>> {
        let documents = self
            .store
            .find(DEALERSHIPS, &Filter::eq(fields::STATE, state))
            .await?;
        decode_all(DEALERSHIPS, documents)
    }

    /// The dealership with the given external id, or `None`.
    ///
    /// Should the collection hold duplicates, the store's first match wins.
    pub async fn get_by_id(&self, id: &DealerId) -> StoreResult<Option<Dealership>> {
        self.store
            .find_one(DEALERSHIPS, &Filter::eq(fields::ID, id))
            .await?
            .map(|document| decode(DEALERSHIPS, document))
            .transpose()
    }
}
