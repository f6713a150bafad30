//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Store construction and the one-shot seed phase
//! - Router configuration with all API endpoints
//! - Middleware stack (request ids, logging, timeouts, CORS)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{dealers, health, reviews};
use crate::routes::{not_found, welcome};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use dealership_reviews::SeedLoader;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack (outermost first):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Tracing spans
/// 4. CORS
/// 5. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Reviews
        .route("/fetchReviews", get(reviews::fetch_reviews))
        .route(
            "/fetchReviews/dealer/{id}",
            get(reviews::fetch_reviews_by_dealer),
        )
        .route("/insert_review", post(reviews::insert_review))
        // Dealerships
        .route("/fetchDealers", get(dealers::fetch_dealers))
        .route("/fetchDealers/{state}", get(dealers::fetch_dealers_by_state))
        .route("/fetchDealer/{id}", get(dealers::fetch_dealer))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .with_state(state)
}

/// Build the store and the shared state, then run the seed phase.
///
/// Seeding completes before this returns, so the router never serves a
/// half-reloaded collection. Seed failures are logged and recorded in the
/// readiness report; they never abort startup. A store that cannot be
/// constructed at all does.
pub async fn prepare_state(config: ServerConfig) -> anyhow::Result<Arc<ServerState>> {
    let store = config.store.store_config().build().await?;
    tracing::info!(backend = ?config.store.backend, "Document store ready");

    let seed = config.seed.clone();
    let state = Arc::new(ServerState::new(config, store.clone()));

    if seed.enabled {
        let report = SeedLoader::new(store).reload_from_files(&seed.files()).await;
        if report.is_complete() {
            tracing::info!("Seed data loaded");
        } else {
            tracing::warn!("Seed data only partially loaded, serving what the store holds");
        }
        state.record_seed(report);
    } else {
        tracing::info!("Seeding disabled");
    }

    Ok(state)
}

/// Start the HTTP server
///
/// Initializes logging, builds the store, seeds it, and serves until
/// SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, CORS: {}",
        config.timeout_secs,
        config.max_body_size_mb,
        config.enable_cors
    );

    let state = prepare_state(config).await?;
    let app = build_router(state);

    tracing::info!("Starting dealership reviews server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
