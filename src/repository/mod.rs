//! Typed repositories over the two collections.

mod dealerships;
mod reviews;

pub use dealerships::DealershipRepository;
pub use reviews::{IdAllocation, ReviewRepository};

use crate::store::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> StoreResult<T> {
    serde_json::from_value(document).map_err(|e| StoreError::invalid_document(collection, e))
}

fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Value>) -> StoreResult<Vec<T>> {
    documents
        .into_iter()
        .map(|document| decode(collection, document))
        .collect()
}
