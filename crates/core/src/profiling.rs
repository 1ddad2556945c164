//! The identifying triple for an upstream profiling resource.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies one table on the upstream profiling service.
///
/// Missing fields deserialize as empty strings so they are reported by
/// [`validate`](Self::validate) rather than by the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub source_key: String,
    pub schema_name: String,
    pub table_name: String,
}

impl ProfileRequest {
    pub fn new(
        source_key: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
        }
    }

    /// Reject the request if any field is empty or whitespace-only.
    ///
    /// All offending fields are listed in a single error message.
    pub fn validate(&self) -> Result<(), CoreError> {
        let missing: Vec<&str> = [
            ("source_key", &self.source_key),
            ("schema_name", &self.schema_name),
            ("table_name", &self.table_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidRequest(format!(
                "{} must not be empty",
                missing.join(", ")
            )))
        }
    }
}

/// Renders as `source.schema.table`, used as log and error context.
impl fmt::Display for ProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.source_key, self.schema_name, self.table_name
        )
    }
}
