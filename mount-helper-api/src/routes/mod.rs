pub mod health;
pub mod logs;
pub mod mounts;

use crate::{error::ApiResult, state::AppState};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(mounts::routes())
        .merge(logs::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run a synchronous core operation on the blocking pool.
pub(crate) async fn run_blocking<T, E, F>(operation: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    crate::error::ApiError: From<E>,
{
    Ok(tokio::task::spawn_blocking(operation).await??)
}
