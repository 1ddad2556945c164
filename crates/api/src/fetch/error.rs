use std::fmt;

use serde::Serialize;
use tableprof_core::error::CoreError;
use tableprof_core::profiling::ProfileRequest;

/// The pipeline step at which a fetch-and-store run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    Validate,
    Fetch,
    Normalize,
    Store,
}

impl FetchStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Fetch => "fetch",
            Self::Normalize => "normalize",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed fetch-and-store run, attributed to a stage and a target table.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{stage} failed for {target}: {error}")]
pub struct FetchError {
    pub stage: FetchStage,
    /// `source_key.schema_name.table_name` of the request.
    pub target: String,
    #[source]
    pub error: CoreError,
}

impl FetchError {
    pub fn new(stage: FetchStage, request: &ProfileRequest, error: CoreError) -> Self {
        Self {
            stage,
            target: request.to_string(),
            error,
        }
    }
}
