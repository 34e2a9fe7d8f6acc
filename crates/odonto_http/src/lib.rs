//! HTTP/JSON boundary for the dental exam recorder.
//!
//! # Responsibility
//! - Preserve the route table and JSON field names existing clients use.
//! - Translate wire payloads into core inputs and core errors into the
//!   uniform `{message, error}` failure body.
//!
//! # Invariants
//! - Handlers never touch SQL; every storage call goes through core services.
//! - Each request checks out its own pooled connection for one core operation.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod wire;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use config::{ConfigError, DbTarget, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/addpaciente", post(routes::patients::add_patient))
        .route("/paciente/{cod_paciente}", get(routes::patients::get_patient))
        .route("/dentes", get(routes::arch::list_arch_entries))
        .route("/dentes/catalogo", get(routes::arch::list_teeth))
        .route("/adddentes", post(routes::arch::add_arch))
        .route("/addmedia", post(routes::averages::add_average))
        .route("/media", get(routes::averages::list_averages))
        .layer(axum_mw::from_fn(middleware::log_request))
        .layer(cors)
        .with_state(state)
}
