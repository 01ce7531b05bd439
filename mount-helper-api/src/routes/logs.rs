use crate::{
    error::ApiResult, extract::JsonBody, routes::run_blocking, state::AppState,
    types::OperationResponse,
};
use axum::{extract::State, routing::post, Json, Router};
use mount_helper_core::DebugLogRequest;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/debugLogs", post(debug_logs))
}

async fn debug_logs(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DebugLogRequest>,
) -> ApiResult<Json<OperationResponse>> {
    let collector = state.collector;
    let logs = run_blocking(move || collector.collect(&req)).await?;

    Ok(Json(logs.into()))
}
