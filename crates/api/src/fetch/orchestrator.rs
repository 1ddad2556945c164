use std::sync::Arc;

use tableprof_core::error::CoreError;
use tableprof_core::normalize::normalize;
use tableprof_core::profiling::ProfileRequest;
use tableprof_core::types::RawProfilePayload;
use tableprof_db::models::profile::{CreateProfileRecord, ProfileRecord};
use tableprof_db::repositories::ProfileRepo;
use tableprof_db::DbPool;
use tableprof_upstream::ProfilingSource;

use super::{FetchError, FetchStage, RetryPolicy};

/// Runs one fetch-and-store for a table: validate the request, fetch the raw
/// payload upstream, normalize it and persist it as a new record.
///
/// Every run that reaches the store stage inserts a new row; repeated fetches
/// of the same table accumulate history.
pub struct FetchOrchestrator {
    pool: DbPool,
    source: Arc<dyn ProfilingSource>,
    retry: RetryPolicy,
}

impl FetchOrchestrator {
    pub fn new(pool: DbPool, source: Arc<dyn ProfilingSource>, retry: RetryPolicy) -> Self {
        Self {
            pool,
            source,
            retry,
        }
    }

    pub async fn fetch_and_store(
        &self,
        request: &ProfileRequest,
    ) -> Result<ProfileRecord, FetchError> {
        let fail = |stage: FetchStage| {
            move |error: CoreError| {
                tracing::warn!(
                    stage = %stage,
                    table = %request,
                    code = error.code(),
                    error = %error,
                    "Profile fetch failed"
                );
                FetchError::new(stage, request, error)
            }
        };

        request.validate().map_err(fail(FetchStage::Validate))?;

        tracing::info!(table = %request, "Fetching table profile");

        let raw = self
            .fetch_with_retry(request)
            .await
            .map_err(fail(FetchStage::Fetch))?;

        let payload = normalize(raw).map_err(fail(FetchStage::Normalize))?;

        let mismatched = payload.summary.mismatches(request);
        if !mismatched.is_empty() {
            tracing::warn!(
                table = %request,
                fields = ?mismatched,
                "Upstream payload names a different table; keeping the requested triple"
            );
        }

        let input = CreateProfileRecord::from_payload(request, payload);
        let record = ProfileRepo::create(&self.pool, &input)
            .await
            .map_err(|e| {
                tracing::error!(table = %request, error = %e, "Failed to persist profile record");
                CoreError::StorageUnavailable(e.to_string())
            })
            .map_err(fail(FetchStage::Store))?;

        tracing::info!(
            table = %request,
            record_id = %record.id,
            row_count = ?record.row_count,
            "Stored table profile"
        );

        Ok(record)
    }

    /// Call the source, retrying transient failures per the retry policy.
    async fn fetch_with_retry(
        &self,
        request: &ProfileRequest,
    ) -> Result<RawProfilePayload, CoreError> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;
        loop {
            match self.source.fetch(request).await {
                Ok(raw) => return Ok(raw),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        table = %request,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Profiling request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
