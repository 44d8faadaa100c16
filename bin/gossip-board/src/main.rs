//! # Gossip-Board Binary
//!
//! The entry point that assembles the application: in-memory broadcast
//! gateway, display scheduler, engine services, maintenance tasks, and the
//! actix HTTP surface.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};

use gb_api::handlers::AppState;
use gb_api::middleware;
use gb_broadcast_memory::BroadcastChannel;
use gb_core::BroadcastGateway;
use gb_engine::{scheduler, tasks, ContentPolicy, ModerationLedger, QuotaTracker, SubmissionPipeline};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let addr = std::env::var("GOSSIP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // 1. The realtime transport (fan-out channel behind the gateway port)
    let gateway: Arc<dyn BroadcastGateway> = Arc::new(BroadcastChannel::default());

    // 2. The display rotation (single task owning queue + slot)
    let handle = scheduler::spawn(gateway.clone());

    // 3. Shared services
    let ledger = Arc::new(ModerationLedger::new());
    let quota = Arc::new(QuotaTracker::default());
    let pipeline = SubmissionPipeline::new(
        ledger.clone(),
        quota.clone(),
        ContentPolicy::standard(),
        handle.clone(),
    );

    // 4. Maintenance: quota reset at local midnight, daily report pruning
    tasks::spawn_daily_reset(quota.clone());
    tasks::spawn_report_pruning(ledger.clone());

    let state = web::Data::new(AppState {
        pipeline,
        quota,
        ledger,
        scheduler: handle,
        gateway,
    });

    log::info!("🚀 Gossip-Board starting on http://{addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(gb_api::configure_routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
