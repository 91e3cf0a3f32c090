use crate::{fault_codes::FaultCodeTable, models::*, state::AppState};
use axum::{extract::State, Json};
use hpmon_telemetry::Snapshot;
use tracing::debug;

/// 最新快照
pub async fn latest(State(state): State<AppState>) -> Json<LatestResponse> {
    Json(state.service.latest().await.into())
}

/// 完整历史
pub async fn timeseries(State(state): State<AppState>) -> Json<Vec<Snapshot>> {
    let history = state.service.history().await;
    debug!(points = history.len(), "Serving timeseries");
    Json(history)
}

/// 设备身份
pub async fn metadata(State(state): State<AppState>) -> Json<MetadataResponse> {
    Json(state.service.metadata().await)
}

/// 故障码说明表
pub async fn error_codes(State(state): State<AppState>) -> Json<FaultCodeTable> {
    Json(state.service.fault_codes().clone())
}
