use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use tableprof_core::error::CoreError;

use crate::fetch::FetchError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`FetchError`] for failed
/// fetch-and-store runs. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tableprof_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A fetch-and-store failure carrying its stage and target table.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => core_body(core),
            AppError::Fetch(fetch) => {
                let (status, mut body) = core_body(&fetch.error);
                body["stage"] = json!(fetch.stage);
                body["target"] = json!(fetch.target);
                (status, body)
            }
            AppError::Database(err) => classify_sqlx_error(err),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for each domain failure.
pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::InvalidShape(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::UpstreamError { .. } | CoreError::UpstreamMalformed(_) => {
            StatusCode::BAD_GATEWAY
        }
        CoreError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::UpstreamUnreachable(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Build the `{error, code}` body for a domain failure.
///
/// Storage details are logged, not returned. Upstream statuses are echoed as
/// `upstream_status`.
fn core_body(err: &CoreError) -> (StatusCode, Value) {
    let message = match err {
        CoreError::StorageUnavailable(msg) => {
            tracing::error!(error = %msg, "Storage unavailable");
            "Profile storage is unavailable".to_string()
        }
        other => other.to_string(),
    };

    let mut body = json!({
        "error": message,
        "code": err.code(),
    });
    if let CoreError::UpstreamError { status, .. } = err {
        body["upstream_status"] = json!(status);
    }

    (status_for(err), body)
}

/// Classify a sqlx error into an HTTP status and error body.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 503 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({ "error": "Resource not found", "code": "NOT_FOUND" }),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "Profile storage is unavailable",
                    "code": "STORAGE_UNAVAILABLE",
                }),
            )
        }
    }
}
