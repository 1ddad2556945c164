use std::sync::Arc;

use crate::config::ServerConfig;
use crate::fetch::FetchOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tableprof_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Validate -> fetch -> normalize -> store pipeline.
    pub orchestrator: Arc<FetchOrchestrator>,
}
