//! Startup reload of the seed datasets.
//!
//! Each collection is replaced independently: delete everything, then insert
//! the dataset. Re-running the reload always converges on exactly the seed
//! contents. Failures are logged and reported, never propagated, so a broken
//! dataset or an unreachable store cannot take the service down.
//!
//! Records are parsed into [`Review`] and [`Dealership`] and written back from
//! those types, so stored documents have the same shape as documents appended
//! over HTTP: optional review fields that the dataset omits are stored as
//! `null`, and numeric-string dealer ids are stored as integers. Unknown
//! dealership fields pass through unchanged.

use crate::model::{Dealership, Review};
use crate::store::{DocumentStore, Filter, StoreError};
use crate::{DEALERSHIPS, REVIEWS};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed dataset `{key}`: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed file has no top-level `{0}` array")]
    MissingKey(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The two seed datasets, already parsed into typed documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedData {
    pub reviews: Vec<Review>,
    pub dealerships: Vec<Dealership>,
}

impl SeedData {
    /// Parse the raw contents of the reviews and dealerships files
    /// (`{"reviews": [...]}` and `{"dealerships": [...]}`).
    pub fn from_json_strs(reviews: &str, dealerships: &str) -> Result<Self, SeedError> {
        Ok(Self {
            reviews: parse_dataset(reviews, REVIEWS)?,
            dealerships: parse_dataset(dealerships, DEALERSHIPS)?,
        })
    }
}

/// Locations of the seed files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFiles {
    pub reviews: PathBuf,
    pub dealerships: PathBuf,
}

/// Outcome of reloading one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectionOutcome {
    Loaded { count: usize },
    Failed { reason: String },
}

impl CollectionOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CollectionOutcome::Loaded { .. })
    }
}

impl From<Result<usize, SeedError>> for CollectionOutcome {
    fn from(result: Result<usize, SeedError>) -> Self {
        match result {
            Ok(count) => CollectionOutcome::Loaded { count },
            Err(e) => CollectionOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Per-collection results of one reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub reviews: CollectionOutcome,
    pub dealerships: CollectionOutcome,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.reviews.is_loaded() && self.dealerships.is_loaded()
    }
}

pub struct SeedLoader {
    store: Arc<dyn DocumentStore>,
}

impl SeedLoader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Replace both collections with already-parsed datasets.
    pub async fn reload(&self, data: SeedData) -> SeedReport {
        let (reviews, dealerships) = tokio::join!(
            self.replace(REVIEWS, data.reviews),
            self.replace(DEALERSHIPS, data.dealerships),
        );
        self.report(reviews, dealerships)
    }

    /// Read both seed files and replace the collections. A file that cannot be
    /// read or parsed only fails its own collection.
    pub async fn reload_from_files(&self, files: &SeedFiles) -> SeedReport {
        let (reviews, dealerships) = tokio::join!(
            async {
                let records: Vec<Review> = read_dataset(&files.reviews, REVIEWS).await?;
                self.replace(REVIEWS, records).await
            },
            async {
                let records: Vec<Dealership> =
                    read_dataset(&files.dealerships, DEALERSHIPS).await?;
                self.replace(DEALERSHIPS, records).await
            },
        );
        self.report(reviews, dealerships)
    }

    async fn replace<T: Serialize>(
        &self,
        collection: &'static str,
        records: Vec<T>,
    ) -> Result<usize, SeedError> {
        let documents = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;

        let removed = self.store.delete_many(collection, &Filter::all()).await?;
        let inserted = self.store.insert_many(collection, documents).await?;
        tracing::info!(collection, removed, inserted, "Seed collection reloaded");
        Ok(inserted)
    }

    fn report(
        &self,
        reviews: Result<usize, SeedError>,
        dealerships: Result<usize, SeedError>,
    ) -> SeedReport {
        for (collection, result) in [(REVIEWS, &reviews), (DEALERSHIPS, &dealerships)] {
            if let Err(e) = result {
                tracing::error!(collection, error = %e, "Seed reload failed");
            }
        }
        SeedReport {
            reviews: reviews.into(),
            dealerships: dealerships.into(),
        }
    }
}

async fn read_dataset<T: DeserializeOwned>(
    path: &Path,
    key: &'static str,
) -> Result<Vec<T>, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_dataset(&raw, key)
}

fn parse_dataset<T: DeserializeOwned>(raw: &str, key: &'static str) -> Result<Vec<T>, SeedError> {
    let mut root: Value =
        serde_json::from_str(raw).map_err(|source| SeedError::Parse { key, source })?;
    let records = root
        .get_mut(key)
        .map(Value::take)
        .ok_or(SeedError::MissingKey(key))?;
    serde_json::from_value(records).map_err(|source| SeedError::Parse { key, source })
}
