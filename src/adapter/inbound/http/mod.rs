//! HTTP front-end: detection intake and read-only queries.

mod error;
mod intake;
mod query;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::application::detection::DetectionService;
use crate::application::pool::JobIdPool;
use crate::application::shutdown::wait_for_shutdown;
use crate::application::stats::StatsStore;
use crate::error::Result;

pub use intake::{parse_detection, GENERATION_KEYS, JOB_ID_KEYS, NAME_KEYS, RARITY_KEYS};
pub use query::{PoolResponse, ServiceInfo};

/// Shared handler state.
#[derive(Clone)]
pub struct HttpState {
    pub pool: Arc<JobIdPool>,
    pub stats: Arc<StatsStore>,
    pub detections: Arc<DetectionService>,
    pub info: Arc<ServiceInfo>,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(query::service_info))
        .route("/jobids", get(query::job_ids))
        .route("/jobs", get(query::job_ids))
        .route("/jobs_history", get(query::job_history))
        .route("/api", post(intake::receive_detection))
        .with_state(state)
}

/// Serve until shutdown is signalled.
pub async fn serve(addr: SocketAddr, state: HttpState, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            wait_for_shutdown(&mut shutdown).await;
            info!("HTTP server shutting down");
        })
        .await?;

    Ok(())
}
