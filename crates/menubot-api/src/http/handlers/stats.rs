//! Service statistics endpoint.
//!
//! GET /stats - uptime, processed message count and live session count.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub messages_processed: u64,
    /// Stored sessions, including expired ones the sweeper has not reached yet.
    pub active_sessions: usize,
    pub timestamp: String,
}

/// GET /stats, GET /api/v1/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime_secs: state.metrics.uptime_secs(),
        messages_processed: state.metrics.messages_processed(),
        active_sessions: state.sessions().len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
