use crate::{
    state::AppState,
    types::{LivenessResponse, LIVENESS_MESSAGE},
};
use axum::{routing::get, Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(liveness))
        .route("/api/health", get(liveness))
}

async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}
