//! # gb-api
//!
//! The web routing and orchestration layer for Gossip-Board.

pub mod handlers;
pub mod error;
pub mod middleware;
pub mod stream;

use actix_web::web;

/// Configures the routes for the gossip board.
///
/// # Developer Note
/// The API scope is registered as a unit so the main binary can mount it
/// under a different prefix if it ever needs to (e.g. /v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Status snapshot for humans and health checks
        .route("/", web::get().to(handlers::status))
        .service(
            web::scope("/api")
                // The submission endpoint (gate chain + enqueue)
                .route("/gossip", web::post().to(handlers::submit_gossip))
                // Per-device quota introspection
                .route("/usage/{device_id}", web::get().to(handlers::usage))
                // Report intake
                .route("/report", web::post().to(handlers::file_report))
                // Moderation overview. No auth here, matching the source
                // service; access control is an external deployment concern.
                .route("/admin/reports", web::get().to(handlers::admin_reports))
                // The realtime channel (SSE adapter over the gateway port)
                .route("/stream", web::get().to(stream::events)),
        );
}
