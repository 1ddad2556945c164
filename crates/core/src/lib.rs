//! Domain types for tableprof.
//!
//! Holds the fetch request, the failure taxonomy shared by every stage of the
//! fetch pipeline, the pure payload normalizer, and env parsing helpers.

pub mod config;
pub mod error;
pub mod normalize;
pub mod profiling;
pub mod types;
