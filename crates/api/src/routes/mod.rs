pub mod health;
pub mod profiles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /profiles                     list (?table_name, ?source_key, ?limit)
/// /profiles/fetch               fetch and store
/// /profiles/{id}                get by id
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/profiles", profiles::router())
}
