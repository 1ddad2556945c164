//! Route definitions for the `/profiles` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /          -> list_profiles
/// POST   /fetch     -> fetch_profile
/// GET    /{id}      -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list_profiles))
        .route("/fetch", post(profiles::fetch_profile))
        .route("/{id}", get(profiles::get_profile))
}
