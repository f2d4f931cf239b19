use actix_web::web;

use crate::metrics::metrics_handler;
use super::handlers;

/// Configure HTTP routes:
/// - `/orders`       - create (POST) and list (GET)
/// - `/orders/{id}`  - fetch (GET), update (PUT), delete (DELETE)
/// - `/health`, `/metrics`, `/`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(handlers::create_order))
            .route("", web::get().to(handlers::list_orders))
            .route("/{id}", web::get().to(handlers::get_order))
            .route("/{id}", web::put().to(handlers::update_order))
            .route("/{id}", web::delete().to(handlers::delete_order)),
    )
    .route("/health", web::get().to(handlers::health))
    .route("/metrics", web::get().to(metrics_handler))
    .route("/", web::get().to(handlers::root));
}
