/// Failure taxonomy for the fetch-and-store pipeline and record lookups.
///
/// Every stage returns one of these variants; callers distinguish "the caller
/// sent a bad request" from "upstream failed" from "storage failed" by variant
/// alone, without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The caller's request was rejected before any network call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The profiling service could not be reached (connect, DNS, timeout).
    #[error("Profiling service unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The profiling service answered with a non-success status.
    #[error("Profiling service returned HTTP {status}: {body}")]
    UpstreamError {
        status: u16,
        /// Response body, truncated for diagnostics.
        body: String,
    },

    /// The profiling service answered 2xx with a body that is not JSON.
    #[error("Profiling service returned a malformed body: {0}")]
    UpstreamMalformed(String),

    /// The payload is JSON but not in a shape the normalizer accepts.
    #[error("Invalid payload shape: {0}")]
    InvalidShape(String),

    /// The persistence layer failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
}

impl CoreError {
    /// Stable machine-readable code, used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidRequest(_) => "INVALID_REQUEST",
            CoreError::UpstreamUnreachable(_) => "UPSTREAM_UNREACHABLE",
            CoreError::UpstreamError { .. } => "UPSTREAM_ERROR",
            CoreError::UpstreamMalformed(_) => "UPSTREAM_MALFORMED",
            CoreError::InvalidShape(_) => "INVALID_SHAPE",
            CoreError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            CoreError::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// Whether retrying the same upstream call may succeed.
    ///
    /// Only network-level failures and 5xx statuses qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::UpstreamUnreachable(_) => true,
            CoreError::UpstreamError { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }
}
