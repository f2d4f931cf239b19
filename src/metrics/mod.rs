// Private module declaration
mod server;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

// Re-export for public API
pub use server::metrics_handler;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP requests by route and status code
// - Orders created
// - Repository call latency and failures
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: IntCounterVec,

    // Order Metrics
    pub orders_created_total: IntCounter,

    // Repository Metrics
    pub persistence_failures_total: IntCounterVec,
    pub repository_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        // Order Metrics
        let orders_created_total = IntCounter::new(
            "orders_created_total",
            "Total orders successfully created",
        )?;
        registry.register(Box::new(orders_created_total.clone()))?;

        // Repository Metrics
        let persistence_failures_total = IntCounterVec::new(
            Opts::new("order_persistence_failures_total", "Total failed repository calls"),
            &["operation"],
        )?;
        registry.register(Box::new(persistence_failures_total.clone()))?;

        let repository_duration = HistogramVec::new(
            HistogramOpts::new("order_repository_duration_seconds", "Repository call duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(repository_duration.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            orders_created_total,
            persistence_failures_total,
            repository_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record a handled request
    pub fn record_request(&self, route: &str, status: u16) {
        self.http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Helper to record a repository call
    pub fn record_repository_call(&self, operation: &str, duration_secs: f64, success: bool) {
        if !success {
            self.persistence_failures_total.with_label_values(&[operation]).inc();
        }
        self.repository_duration.with_label_values(&[operation]).observe(duration_secs);
    }

    pub fn record_order_created(&self) {
        self.orders_created_total.inc();
    }
}
