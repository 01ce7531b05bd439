use crate::{
    error::ApiResult,
    extract::{parse_json, JsonBody},
    routes::run_blocking,
    state::AppState,
    types::OperationResponse,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use mount_helper_core::{MountRequest, StatusRequest, UnmountRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/mount", post(mount))
        .route("/api/umount", post(unmount))
        .route("/api/mountStatus", get(mount_status))
}

async fn mount(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<MountRequest>,
) -> ApiResult<Json<OperationResponse>> {
    let orchestrator = state.orchestrator;
    let outcome = run_blocking(move || orchestrator.mount(&req)).await?;

    Ok(Json(outcome.into()))
}

async fn unmount(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UnmountRequest>,
) -> ApiResult<Json<OperationResponse>> {
    let orchestrator = state.orchestrator;
    let outcome = run_blocking(move || orchestrator.unmount(&req)).await?;

    Ok(Json(outcome.into()))
}

/// Reads the target from the JSON body, or from `?targetPath=` when the body is empty.
async fn mount_status(
    State(state): State<AppState>,
    Query(query): Query<StatusRequest>,
    body: Bytes,
) -> ApiResult<Json<OperationResponse>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        query
    } else {
        parse_json::<StatusRequest>(&body)?
    };

    let orchestrator = state.orchestrator;
    let outcome = run_blocking(move || orchestrator.status(&req)).await?;

    Ok(Json(outcome.into()))
}
