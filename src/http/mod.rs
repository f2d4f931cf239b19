// ============================================================================
// HTTP Layer - actix-web handlers for the order API
// ============================================================================
//
// Structure:
// - error     - ApiError and its mapping to status codes
// - handlers  - request handlers (create, list, get, update, delete, health)
// - routes    - route table
// - server    - HttpServer bootstrap
//
// Handlers receive their collaborators through AppState. Nothing in here
// reaches for global state.
//
// ============================================================================

mod error;
mod handlers;
mod routes;
mod server;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::metrics::Metrics;
use crate::repository::{OrderRepository, PersistenceError};

pub use error::ApiError;
pub use routes::configure_routes;
pub use server::run_server;

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub repository: Arc<dyn OrderRepository>,
    pub metrics: Arc<Metrics>,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        metrics: Arc<Metrics>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            metrics,
            request_timeout,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Run a repository call under the request deadline.
    /// On expiry the call's future is dropped, which aborts the in-flight statement.
    pub async fn persist<T, F>(&self, operation: &'static str, call: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = Result<T, PersistenceError>>,
    {
        let started = Instant::now();

        let result = match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PersistenceError::Timeout(self.request_timeout)),
        };

        self.metrics.record_repository_call(
            operation,
            started.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        result
    }
}
