//! # medslot API
//!
//! The API crate provides the web server for doctor time-slot scheduling. It
//! exposes endpoints for generating slots from an availability window and for
//! booking, releasing, deleting and listing them.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests and call the slot store
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage sits behind the
//! `SlotStore` trait, backed by PostgreSQL or by process memory.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::Result;
use medslot_db::{DbPool, MemorySlotStore, PgSlotStore, SlotStore};
use tokio::{net::TcpListener, task::JoinHandle};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Authoritative slot storage
    pub store: Arc<dyn SlotStore>,
    /// Which backend `store` is, reported by the health check
    pub store_kind: &'static str,
}

impl ApiState {
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            store: Arc::new(PgSlotStore::new(pool)),
            store_kind: "postgres",
        }
    }

    pub fn memory() -> Self {
        Self {
            store: Arc::new(MemorySlotStore::new()),
            store_kind: "memory",
        }
    }

    pub fn with_store(store: Arc<dyn SlotStore>, store_kind: &'static str) -> Self {
        Self { store, store_kind }
    }
}

/// Builds the application router with all routes attached to `state`
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot generation, booking and listing endpoints
        .merge(routes::slots::routes())
        .with_state(state)
}

/// The calendar day `now` falls on in the clinic's timezone. Slot dates are
/// local days.
pub fn clinic_today(timezone: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&timezone).date_naive()
}

/// Periodically removes unbooked slots dated before the clinic's current day.
pub fn spawn_slot_expiry(
    store: Arc<dyn SlotStore>,
    every: Duration,
    timezone: Tz,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let today = clinic_today(timezone, Utc::now());
            if let Err(e) = store.expire_before(today).await {
                warn!("Slot expiry sweep failed: {}", e);
            }
        }
    })
}

/// Starts the API server with the provided configuration and state
///
/// Initializes logging, attaches CORS, tracing and timeout layers, starts
/// the expiry sweep and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Using {} slot store", state.store_kind);

    if config.slot_expiry_interval > 0 {
        spawn_slot_expiry(
            Arc::clone(&state.store),
            Duration::from_secs(config.slot_expiry_interval),
            config.timezone,
        );
    }

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<_> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
