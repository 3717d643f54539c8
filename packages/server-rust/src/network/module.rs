//! HTTP module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! split lets embedders (and tests) learn the bound port before any
//! request is served.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::storage::UserStore;

use super::config::ServerConfig;
use super::handlers::{
    create_user_handler, delete_user_handler, health_handler, list_users_handler,
    liveness_handler, readiness_handler, update_user_handler, AppState,
};
use super::middleware::apply_http_layers;
use super::shutdown::ShutdownController;

/// How long `serve` waits for in-flight requests after the shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the HTTP server lifecycle around a [`UserStore`].
pub struct HttpModule {
    config: ServerConfig,
    store: Arc<dyn UserStore>,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl HttpModule {
    /// Creates a module without binding any port.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            config,
            store,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Returns a shared reference to the shutdown controller, so embedders
    /// can trigger or observe shutdown from outside.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured
    /// one when port 0 (OS-assigned) is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health`, `GET /health/live`, `GET /health/ready`
    /// - `GET|POST /users`, `PUT|DELETE /users/{id}`
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            store: Arc::clone(&self.store),
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        };

        let router = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/users", get(list_users_handler).post(create_user_handler))
            .route(
                "/users/{id}",
                put(update_user_handler).delete(delete_user_handler),
            )
            .with_state(state);

        apply_http_layers(router, &self.config)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// Consumes `self` because the listener moves into the server. After
    /// the signal, the health state transitions to Draining and in-flight
    /// requests get up to [`DRAIN_TIMEOUT`] to complete.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O failure.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let controller = Arc::clone(&self.shutdown);

        controller.set_ready();

        let drain_trigger = Arc::clone(&controller);
        let shutdown = async move {
            shutdown.await;
            drain_trigger.trigger_shutdown();
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        if controller.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("all in-flight requests drained");
        } else {
            warn!(
                "drain timed out with {} request(s) still in flight",
                controller.in_flight_count()
            );
        }
        Ok(())
    }
}
