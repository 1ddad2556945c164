//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&SqlitePool` as the first argument.

pub mod profile_repo;

pub use profile_repo::ProfileRepo;

/// Largest page size a list call may request.
pub const MAX_LIMIT: i64 = 1000;

/// SQLite reads a negative `LIMIT` as "no limit".
const NO_LIMIT: i64 = -1;

/// Resolve an optional page size for a `LIMIT` bind.
///
/// `None` returns every matching row; `Some(n)` is clamped to `1..=MAX_LIMIT`.
pub fn resolve_limit(limit: Option<i64>) -> i64 {
    match limit {
        None => NO_LIMIT,
        Some(n) => n.clamp(1, MAX_LIMIT),
    }
}
