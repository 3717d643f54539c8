//! HTTP server lifecycle: configuration, middleware, shutdown control,
//! and request handlers.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::ServerConfig;
pub use handlers::AppState;
pub use module::HttpModule;
pub use shutdown::{HealthState, InFlightGuard, ShutdownController};
