pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;

use std::any::Any;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::handlers::{health_check, join_waitlist, landing_page};

/// Load configuration from environment variables
pub fn load_config() -> std::result::Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load()?)
}

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the application router
///
/// - `GET /`: landing page
/// - `GET /api/health`: health check
/// - `POST /api/waitlist`: waitlist signup
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/waitlist", post(join_waitlist));

    Router::new()
        .route("/", get(landing_page))
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into the `unhandled` JSON error.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    Error::Unhandled(detail).into_response()
}
