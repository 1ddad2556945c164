//! Repository for the `profile_records` table.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tableprof_core::types::RecordId;
use uuid::Uuid;

use crate::models::profile::{CreateProfileRecord, ProfileFilter, ProfileRecord};
use crate::repositories::resolve_limit;

/// Column list for `profile_records` queries.
const COLUMNS: &str = "id, source_key, schema_name, table_name, upstream_profile_id, \
                       row_count, column_count, profiled_at, profiling_data, created_at";

/// Provides append and read operations for profile records.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new record with a fresh id and creation time, returning the
    /// stored row.
    ///
    /// A single `INSERT ... RETURNING` statement, so the row is either fully
    /// committed or not written at all.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateProfileRecord,
    ) -> Result<ProfileRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO profile_records \
                (id, source_key, schema_name, table_name, upstream_profile_id, \
                 row_count, column_count, profiled_at, profiling_data, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.source_key)
            .bind(&input.schema_name)
            .bind(&input.table_name)
            .bind(&input.upstream_profile_id)
            .bind(input.row_count)
            .bind(input.column_count)
            .bind(input.profiled_at)
            .bind(Json(&input.profiling_data))
            .bind(Utc::now())
            .fetch_one(pool)
            .await?;

        tracing::debug!(id = %record.id, table = %record.table_name, "Profile record inserted");
        Ok(record)
    }

    /// Find a record by its id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: RecordId,
    ) -> Result<Option<ProfileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profile_records WHERE id = ?1");
        sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records newest-first, optionally filtered by exact `table_name`
    /// and/or `source_key`. Records created in the same instant keep
    /// reverse insertion order. Without a `limit` every matching record is
    /// returned.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ProfileFilter,
    ) -> Result<Vec<ProfileRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profile_records \
             WHERE (?1 IS NULL OR table_name = ?1) \
               AND (?2 IS NULL OR source_key = ?2) \
             ORDER BY created_at DESC, rowid DESC \
             LIMIT ?3"
        );
        sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(filter.table_name.as_deref())
            .bind(filter.source_key.as_deref())
            .bind(resolve_limit(filter.limit))
            .fetch_all(pool)
            .await
    }

    /// Total number of stored records.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM profile_records")
            .fetch_one(pool)
            .await
    }
}
