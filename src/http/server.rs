use actix_web::{web, App, HttpServer};

use super::{configure_routes, AppState};

/// Serve the order API until SIGINT/SIGTERM. actix drains in-flight requests before returning.
pub async fn run_server(state: web::Data<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    tracing::info!("🚀 Starting order API on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await
}
