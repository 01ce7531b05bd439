//! # Mount Helper API
//!
//! HTTP front end of the privileged mount helper sidecar. An unprivileged
//! caller posts mount lifecycle requests; the handlers hand them to
//! [`mount_helper_core::MountOrchestrator`] on the blocking pool and map the
//! outcome to a status code:
//!
//! | Route | Success | Bad request | Host failure |
//! |---|---|---|---|
//! | `POST /api/mount` | 200 | 400 | 500 |
//! | `POST /api/umount` | 200 | 400 | 500 |
//! | `GET /api/mountStatus` | 200 | 400 | 500 |
//! | `POST /api/debugLogs` | 200 | 400 | 500 |
//!
//! `GET /`, `/health` and `/api/health` answer liveness probes.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use config::{Config, ListenAddress};
pub use error::{ApiError, ApiResult};
pub use routes::create_app;
pub use server::{run_server, shutdown_signal};
pub use state::AppState;
pub use types::{LivenessResponse, OperationResponse, LIVENESS_MESSAGE};

/// Service name for logging and process management
pub const SERVICE_NAME: &str = "mount-helper";
