//! Request handlers and the shared state they extract.

pub mod health;
pub mod users;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use users::{create_user_handler, delete_user_handler, list_users_handler, update_user_handler};

use std::sync::Arc;
use std::time::Instant;

use crate::storage::UserStore;

use super::ShutdownController;

/// Shared application state passed to all axum handlers via `State`
/// extraction. Holds `Arc` references so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The users collection backing the API.
    pub store: Arc<dyn UserStore>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
