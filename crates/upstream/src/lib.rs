//! HTTP client for the external profiling service.
//!
//! [`ProfilingSource`] is the seam the fetch pipeline depends on;
//! [`ProfilingClient`] is the production implementation over [`reqwest`].

pub mod client;
pub mod config;

pub use client::{ClientError, ProfilingClient, ProfilingSource};
pub use config::UpstreamConfig;
