//! API route handlers
//!
//! - `reviews`: review listings and review submission
//! - `dealers`: dealership listings and lookup
//! - `health`: liveness and readiness probes

pub mod dealers;
pub mod health;
pub mod reviews;

use crate::error::ServerError;

/// Root endpoint (GET /), plain text.
pub async fn welcome() -> &'static str {
    "Welcome to the Dealership Reviews API"
}

/// 404 Not Found handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound("Not found")
}
