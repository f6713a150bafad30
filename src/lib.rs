//! Data access for the dealership review service.
//!
//! This crate owns everything below the HTTP layer:
//!
//! - [`model`]: typed `Review` and `Dealership` documents
//! - [`store`]: the [`DocumentStore`] abstraction with in-memory and MongoDB backends
//! - [`repository`]: typed queries over the `reviews` and `dealerships` collections,
//!   including sequential id allocation for new reviews
//! - [`seed`]: the idempotent startup reload of both collections
//!
//! Repositories hold no state between requests; every read goes back to the store.

pub mod model;
pub mod repository;
pub mod seed;
pub mod store;

pub use model::{CarYear, DealerId, Dealership, NewReview, Review};
pub use repository::{DealershipRepository, IdAllocation, ReviewRepository};
pub use seed::{CollectionOutcome, SeedData, SeedError, SeedFiles, SeedLoader, SeedReport};
pub use store::{
    DocumentStore, Filter, InMemoryStore, SortOrder, SortSpec, StoreConfig, StoreError,
    StoreResult,
};

/// Collection holding review documents.
pub const REVIEWS: &str = "reviews";

/// Collection holding dealership documents.
pub const DEALERSHIPS: &str = "dealerships";
