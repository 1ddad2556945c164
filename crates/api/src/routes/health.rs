//! Liveness and readiness for the profiling service.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tableprof_db::repositories::ProfileRepo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` when the profile store answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Records in the store; absent when the store cannot be queried.
    pub stored_profiles: Option<i64>,
    /// Endpoint fetches are sent to.
    pub profiling_url: String,
}

/// GET /health
///
/// Counting stored profiles doubles as the database probe: the store is
/// healthy exactly when the count query succeeds.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stored_profiles = match ProfileRepo::count(&state.pool).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not query the profile store");
            None
        }
    };
    let db_healthy = stored_profiles.is_some();

    Json(HealthResponse {
        status: if db_healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        stored_profiles,
        profiling_url: state.config.upstream.base_url.clone(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
