//! Dealership Reviews Server - HTTP JSON API over dealership and review data
//!
//! The server seeds the `reviews` and `dealerships` collections at startup
//! and then serves read queries plus review submission. There is no
//! authentication.
//!
//! # API Endpoints
//!
//! - `GET /` - Welcome text
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with the seed report
//! - `GET /fetchReviews` - All reviews
//! - `GET /fetchReviews/dealer/{id}` - Reviews for one dealer
//! - `GET /fetchDealers` - All dealerships
//! - `GET /fetchDealers/{state}` - Dealerships in a state
//! - `GET /fetchDealer/{id}` - One dealership, 404 when absent
//! - `POST /insert_review` - Append a review; the response carries its new id
//!
//! Errors are returned as `{"error": "<message>"}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, prepare_state, start_server};
pub use state::ServerState;
