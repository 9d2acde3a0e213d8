//! Read-only query endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::HttpState;
use crate::domain::HistoryEntry;

/// Static service information echoed by `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub proxy_count: usize,
    pub game_id: String,
    pub target_api: Option<String>,
    pub send_min_servers: usize,
    pub max_pages_per_cycle: u32,
    pub min_players: u32,
    pub max_players: u32,
}

#[derive(Debug, Serialize)]
pub struct PoolResponse {
    pub count: usize,
    pub servers: Vec<String>,
}

pub async fn service_info(State(state): State<HttpState>) -> Json<ServiceInfo> {
    Json(state.info.as_ref().clone())
}

pub async fn job_ids(State(state): State<HttpState>) -> Json<PoolResponse> {
    let servers = state.pool.snapshot();
    Json(PoolResponse {
        count: servers.len(),
        servers: servers.as_ref().clone(),
    })
}

pub async fn job_history(State(state): State<HttpState>) -> Json<Vec<HistoryEntry>> {
    Json(state.stats.history())
}
