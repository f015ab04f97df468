//! Process status endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusReport {
    #[serde(rename = "UpTime")]
    pub uptime: String,
    #[serde(rename = "PID")]
    pub pid: u32,
    #[serde(rename = "Version")]
    pub version: String,
}

/// GET /.status
pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(StatusReport {
        uptime: format!("{:?}", state.started_at.elapsed()),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
