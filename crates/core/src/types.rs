/// Profile records are keyed by a random UUID assigned at insert time.
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The untyped JSON body returned by the upstream profiling service.
pub type RawProfilePayload = serde_json::Value;
