//! Handlers for fetching, reading and listing table profiles.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tableprof_core::error::CoreError;
use tableprof_core::profiling::ProfileRequest;
use tableprof_core::types::RecordId;
use tableprof_db::models::profile::{ProfileFilter, ProfileRecord};
use tableprof_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Page size for `GET /profiles` when the caller gives no `limit`.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// POST /api/v1/profiles/fetch
///
/// Fetch the table's profile from the profiling service and store it as a
/// new record.
pub async fn fetch_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProfileRecord>>)> {
    let record = state.orchestrator.fetch_and_store(&request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/profiles/{id}
///
/// An id that is not a UUID is rejected as `INVALID_REQUEST`.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<ProfileRecord>>> {
    let id: RecordId = raw_id.parse().map_err(|_| {
        CoreError::InvalidRequest(format!("id {raw_id:?} is not a valid UUID"))
    })?;
    let record = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ProfileRecord",
                id: id.to_string(),
            })
        })?;
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/profiles?table_name=&source_key=&limit=
///
/// Blank filter values are treated as absent. Without `limit`, the newest
/// [`DEFAULT_LIST_LIMIT`] records are returned.
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(filter): Query<ProfileFilter>,
) -> AppResult<Json<DataResponse<Vec<ProfileRecord>>>> {
    let filter = ProfileFilter {
        table_name: non_blank(filter.table_name),
        source_key: non_blank(filter.source_key),
        limit: Some(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };
    let records = ProfileRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: records }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
