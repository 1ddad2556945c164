//! Profile record entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use tableprof_core::normalize::ProfilePayload;
use tableprof_core::profiling::ProfileRequest;
use tableprof_core::types::{RecordId, Timestamp};

/// A row from the `profile_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileRecord {
    pub id: RecordId,
    pub source_key: String,
    pub schema_name: String,
    pub table_name: String,
    pub upstream_profile_id: Option<String>,
    pub row_count: Option<i64>,
    pub column_count: Option<i64>,
    pub profiled_at: Option<Timestamp>,
    pub profiling_data: Json<Map<String, Value>>,
    pub created_at: Timestamp,
}

/// DTO for inserting a profile record. `id` and `created_at` are assigned by
/// the repository.
#[derive(Debug, Clone)]
pub struct CreateProfileRecord {
    pub source_key: String,
    pub schema_name: String,
    pub table_name: String,
    pub upstream_profile_id: Option<String>,
    pub row_count: Option<i64>,
    pub column_count: Option<i64>,
    pub profiled_at: Option<Timestamp>,
    pub profiling_data: Map<String, Value>,
}

impl CreateProfileRecord {
    /// Combine the identifying triple from the request with a normalized
    /// payload. The triple always comes from the request, never from the
    /// upstream's echo of it.
    pub fn from_payload(request: &ProfileRequest, payload: ProfilePayload) -> Self {
        let ProfilePayload { data, summary } = payload;
        Self {
            source_key: request.source_key.clone(),
            schema_name: request.schema_name.clone(),
            table_name: request.table_name.clone(),
            upstream_profile_id: summary.upstream_profile_id,
            row_count: summary.row_count,
            column_count: summary.column_count,
            profiled_at: summary.profiled_at,
            profiling_data: data,
        }
    }
}

/// Filters for listing profile records. All filters are exact matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    pub table_name: Option<String>,
    pub source_key: Option<String>,
    /// `None` returns every match; otherwise clamped to 1..=1000.
    pub limit: Option<i64>,
}
