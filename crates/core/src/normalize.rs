//! Profile payload normalizer.
//!
//! Turns the loosely-typed JSON returned by the profiling service into a
//! [`ProfilePayload`]: the original object kept verbatim plus a
//! [`ProfileSummary`] of the handful of fields tableprof actually reads.
//!
//! Upstream deployments disagree on key casing (`rowCount` vs `row_count`)
//! and on value encoding (`120000`, `120000.0`, `"120000"`), so every known
//! field is looked up under both spellings and coerced where the meaning is
//! unambiguous. A summary field that still does not fit is logged and left
//! as `None`; only a non-object top level is rejected. Unknown fields pass
//! through untouched.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::profiling::ProfileRequest;
use crate::types::{RawProfilePayload, Timestamp};

/// Naive timestamp layouts accepted when the upstream omits an offset.
/// Values in these layouts are taken as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Canonical form of one upstream profiling response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePayload {
    /// The upstream object, key order preserved, no fields dropped or added.
    pub data: Map<String, Value>,
    pub summary: ProfileSummary,
}

/// Known fields extracted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub upstream_profile_id: Option<String>,
    pub source_key: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub row_count: Option<i64>,
    pub column_count: Option<i64>,
    pub profiled_at: Option<Timestamp>,
}

impl ProfileSummary {
    /// Names of the identifying fields the upstream echoed back with a value
    /// different from the request. Fields the upstream omitted are not
    /// reported.
    pub fn mismatches(&self, request: &ProfileRequest) -> Vec<&'static str> {
        let pairs: [(&'static str, Option<&str>, &str); 3] = [
            ("source_key", self.source_key.as_deref(), &request.source_key),
            ("schema_name", self.schema_name.as_deref(), &request.schema_name),
            ("table_name", self.table_name.as_deref(), &request.table_name),
        ];
        pairs
            .into_iter()
            .filter(|(_, echoed, requested)| echoed.is_some_and(|e| e != *requested))
            .map(|(name, _, _)| name)
            .collect()
    }
}

/// Epoch values above this magnitude are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 2e10;

/// Largest float that still converts to an exact integer count.
const MAX_EXACT_FLOAT: f64 = 9.0e15;

const ID_KEYS: &[&str] = &["id", "profile_id", "profileId"];
const SOURCE_KEY_KEYS: &[&str] = &["sourceKey", "source_key"];
const SCHEMA_NAME_KEYS: &[&str] = &["schemaName", "schema_name"];
const TABLE_NAME_KEYS: &[&str] = &["tableName", "table_name"];
const ROW_COUNT_KEYS: &[&str] = &["rowCount", "row_count"];
const COLUMN_COUNT_KEYS: &[&str] = &["columnCount", "column_count"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "profiled_at", "profiledAt"];

/// Normalize a raw upstream payload.
///
/// Fails only when the top level is not a JSON object. The same input always
/// yields the same output, and feeding `payload.data` back in yields an
/// identical [`ProfilePayload`].
pub fn normalize(raw: RawProfilePayload) -> Result<ProfilePayload, CoreError> {
    let data = match raw {
        Value::Object(map) => map,
        other => {
            return Err(CoreError::InvalidShape(format!(
                "expected a JSON object at top level, got {}",
                json_type(&other)
            )))
        }
    };

    if let Some((key, columns)) = lookup(&data, &["columns"]) {
        if !columns.is_array() && !columns.is_object() {
            tracing::warn!(
                field = key,
                value_type = json_type(columns),
                "Profiling payload columns are neither an array nor an object"
            );
        }
    }

    let summary = ProfileSummary {
        upstream_profile_id: summary_field(&data, ID_KEYS, identifier),
        source_key: summary_field(&data, SOURCE_KEY_KEYS, text),
        schema_name: summary_field(&data, SCHEMA_NAME_KEYS, text),
        table_name: summary_field(&data, TABLE_NAME_KEYS, text),
        row_count: summary_field(&data, ROW_COUNT_KEYS, count),
        column_count: summary_field(&data, COLUMN_COUNT_KEYS, count),
        profiled_at: summary_field(&data, TIMESTAMP_KEYS, timestamp),
    };

    Ok(ProfilePayload { data, summary })
}

/// First key among `keys` present with a non-null value.
fn lookup<'a>(
    data: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| data.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

/// Look up a summary field and convert it, logging values that do not fit.
fn summary_field<T>(
    data: &Map<String, Value>,
    keys: &[&'static str],
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let (key, value) = lookup(data, keys)?;
    let converted = convert(value);
    if converted.is_none() {
        tracing::warn!(
            field = key,
            value_type = json_type(value),
            "Ignoring unusable profiling summary field"
        );
    }
    converted
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// A non-negative integer, given as an integer, an integral float or a
/// numeric string.
fn count(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }?;
    (n >= 0).then_some(n)
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT).then_some(f as i64)
}

/// An RFC 3339 or naive ISO-8601 string, or a Unix epoch in seconds or
/// milliseconds (as a number or a numeric string).
fn timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            NAIVE_TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
                .or_else(|| s.parse::<f64>().ok().and_then(from_epoch))
        }
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        _ => None,
    }
}

fn from_epoch(value: f64) -> Option<Timestamp> {
    if !value.is_finite() {
        return None;
    }
    let secs = if value.abs() > EPOCH_MILLIS_THRESHOLD {
        value / 1000.0
    } else {
        value
    };
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn full_payload() -> Value {
        json!({
            "id": "prof-8812",
            "sourceKey": "nemo_telecom_data",
            "schemaName": "billing_finance_space",
            "tableName": "billing_transactions",
            "columnCount": 2,
            "rowCount": 120000,
            "timestamp": "2025-03-04T10:15:00Z",
            "columns": [
                {
                    "columnName": "id",
                    "dataType": "bigint",
                    "nullPercentage": 0.0,
                    "distinctCount": 120000
                },
                {
                    "columnName": "amount",
                    "dataType": "decimal",
                    "nullPercentage": 1.5,
                    "distinctCount": 9031,
                    "minValue": 0.01,
                    "maxValue": 9999.0
                }
            ],
            "sampling": {"strategy": "reservoir", "size": 10000}
        })
    }

    #[test]
    fn minimal_payload_is_kept_verbatim() {
        let raw = json!({"columns": {"id": {"nulls": 0}}});
        let payload = normalize(raw.clone()).unwrap();

        assert_eq!(Value::Object(payload.data), raw);
        assert_eq!(payload.summary, ProfileSummary::default());
    }

    #[test]
    fn known_fields_are_extracted() {
        let payload = normalize(full_payload()).unwrap();
        let summary = payload.summary;

        assert_eq!(summary.upstream_profile_id.as_deref(), Some("prof-8812"));
        assert_eq!(summary.table_name.as_deref(), Some("billing_transactions"));
        assert_eq!(summary.row_count, Some(120000));
        assert_eq!(summary.column_count, Some(2));
        assert_eq!(
            summary.profiled_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn unknown_fields_survive_in_order() {
        let payload = normalize(full_payload()).unwrap();
        let keys: Vec<&str> = payload.data.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            [
                "id",
                "sourceKey",
                "schemaName",
                "tableName",
                "columnCount",
                "rowCount",
                "timestamp",
                "columns",
                "sampling"
            ]
        );
        assert_eq!(payload.data["sampling"]["strategy"], "reservoir");
    }

    #[test]
    fn snake_case_spellings_are_accepted() {
        let payload = normalize(json!({
            "profile_id": 42,
            "row_count": 10,
            "column_count": 3,
            "profiled_at": "2025-03-04T10:15:00"
        }))
        .unwrap();

        assert_eq!(payload.summary.upstream_profile_id.as_deref(), Some("42"));
        assert_eq!(payload.summary.row_count, Some(10));
        assert_eq!(payload.summary.column_count, Some(3));
        assert!(payload.summary.profiled_at.is_some());
    }

    #[test]
    fn null_known_fields_are_treated_as_absent() {
        let payload = normalize(json!({"rowCount": null, "timestamp": null})).unwrap();
        assert_eq!(payload.summary.row_count, None);
        assert_eq!(payload.summary.profiled_at, None);
        assert!(payload.data.contains_key("rowCount"));
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let once = normalize(full_payload()).unwrap();
        let twice = normalize(Value::Object(once.data.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn top_level_array_is_rejected() {
        assert_matches!(
            normalize(json!([{"columns": {}}])),
            Err(CoreError::InvalidShape(msg)) if msg.contains("got array")
        );
    }

    #[test]
    fn top_level_scalar_is_rejected() {
        assert_matches!(normalize(json!("ok")), Err(CoreError::InvalidShape(_)));
        assert_matches!(normalize(Value::Null), Err(CoreError::InvalidShape(_)));
    }

    #[test]
    fn scalar_columns_are_kept_without_failing() {
        let payload = normalize(json!({"columns": 7, "rowCount": 3})).unwrap();
        assert_eq!(payload.data["columns"], 7);
        assert_eq!(payload.summary.row_count, Some(3));
    }

    #[test]
    fn integral_float_count_is_accepted() {
        let payload = normalize(json!({"rowCount": 120000.0, "columns": {}})).unwrap();
        assert_eq!(payload.summary.row_count, Some(120_000));
    }

    #[test]
    fn numeric_string_count_is_accepted() {
        let payload = normalize(json!({"rowCount": "120000", "columnCount": " 2.0 "})).unwrap();
        assert_eq!(payload.summary.row_count, Some(120_000));
        assert_eq!(payload.summary.column_count, Some(2));
    }

    #[test]
    fn unusable_counts_become_none() {
        let payload = normalize(json!({
            "rowCount": -1,
            "columnCount": 2.5,
            "row_count": 9
        }))
        .unwrap();
        assert_eq!(payload.summary.row_count, None);
        assert_eq!(payload.summary.column_count, None);

        let payload = normalize(json!({"rowCount": "many", "columnCount": [2]})).unwrap();
        assert_eq!(payload.summary.row_count, None);
        assert_eq!(payload.summary.column_count, None);
    }

    #[test]
    fn epoch_seconds_and_millis_are_accepted() {
        let expected = Some(Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 0).unwrap());

        let secs = normalize(json!({"timestamp": 1_741_083_300})).unwrap();
        assert_eq!(secs.summary.profiled_at, expected);

        let millis = normalize(json!({"timestamp": 1_741_083_300_000_i64})).unwrap();
        assert_eq!(millis.summary.profiled_at, expected);

        let text = normalize(json!({"timestamp": "1741083300"})).unwrap();
        assert_eq!(text.summary.profiled_at, expected);
    }

    #[test]
    fn unusable_timestamp_becomes_none() {
        let payload = normalize(json!({"timestamp": "last tuesday"})).unwrap();
        assert_eq!(payload.summary.profiled_at, None);
        assert_eq!(payload.data["timestamp"], "last tuesday");

        let payload = normalize(json!({"timestamp": true})).unwrap();
        assert_eq!(payload.summary.profiled_at, None);
    }

    #[test]
    fn wrongly_typed_echo_and_id_become_none() {
        let payload = normalize(json!({"id": {"v": 1}, "tableName": 12})).unwrap();
        assert_eq!(payload.summary.upstream_profile_id, None);
        assert_eq!(payload.summary.table_name, None);
    }

    #[test]
    fn mismatches_report_only_differing_echoes() {
        let payload = normalize(json!({
            "sourceKey": "nemo_telecom_data",
            "tableName": "billing_transactions_v2"
        }))
        .unwrap();
        let req = ProfileRequest::new(
            "nemo_telecom_data",
            "billing_finance_space",
            "billing_transactions",
        );

        assert_eq!(payload.summary.mismatches(&req), ["table_name"]);
    }
}
