use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dealership_reviews::StoreError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// The `Display` text of each variant is exactly what the client sees in the
/// `error` field; store failures only expose their operation context.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

/// API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Adapter for `map_err` that tags a store failure with the operation's message.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ServerError {
        move |source| ServerError::Store { context, source }
    }

    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::Store { context, source } => {
                tracing::error!(operation = %context, error = %source, "Store operation failed");
            }
            ServerError::InvalidJson(e) => {
                tracing::debug!(error = %e, "Rejected request body");
            }
            ServerError::NotFound(_) => {}
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_hide_backend_detail() {
        let err = ServerError::store("Error fetching documents")(StoreError::backend(
            "connection refused to 10.0.0.3",
        ));
        assert_eq!(err.to_string(), "Error fetching documents");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_codes() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ServerError::InvalidJson(parse_err).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::NotFound("Dealer not found").status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
