//! The fetch-and-store pipeline: validate, fetch, normalize, store.

mod error;
mod orchestrator;
mod retry;

pub use error::{FetchError, FetchStage};
pub use orchestrator::FetchOrchestrator;
pub use retry::RetryPolicy;
