//! # gb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the engine
//! services. Handlers stay thin: field presence checks live here, everything
//! behavioral sits behind the pipeline / ledger / quota services.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use gb_core::{AppError, BroadcastGateway};
use gb_engine::quota::next_reset;
use gb_engine::{ModerationLedger, QuotaTracker, SchedulerHandle, SubmissionPipeline};

use crate::error::ApiError;

/// State shared across all actix workers.
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub quota: Arc<QuotaTracker>,
    pub ledger: Arc<ModerationLedger>,
    pub scheduler: SchedulerHandle,
    pub gateway: Arc<dyn BroadcastGateway>,
}

/// Reports shown on the admin overview.
const ADMIN_REPORT_WINDOW: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub content: Option<String>,
    pub device_id: Option<String>,
}

/// `POST /api/gossip` — the submission gate chain.
pub async fn submit_gossip(
    data: web::Data<AppState>,
    body: web::Json<SubmitRequest>,
) -> Result<HttpResponse, ApiError> {
    let content = body.content.as_deref().ok_or(AppError::MissingField("content"))?;
    let device_id = body.device_id.as_deref().ok_or(AppError::MissingField("deviceId"))?;

    let accepted = data.pipeline.submit(content, device_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "queuePosition": accepted.queue_position,
        "userUsage": accepted.usage,
    })))
}

/// `GET /api/usage/{device_id}` — remaining quota and the next reset time.
pub async fn usage(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let device_id = path.into_inner();
    if data.ledger.is_banned(&device_id) {
        return Err(AppError::Forbidden("device is banned".into()).into());
    }

    let used = data.quota.usage(&device_id);
    Ok(HttpResponse::Ok().json(json!({
        "usage": used,
        "remaining": data.quota.limit().saturating_sub(used),
        "resetTime": next_reset(Local::now()).to_rfc3339(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub content: Option<String>,
    pub reason: Option<String>,
    /// Client-side timestamp; accepted but the ledger records server time.
    #[allow(dead_code)]
    pub timestamp: Option<String>,
    pub device_id: Option<String>,
    pub app_version: Option<String>,
}

/// `POST /api/report` — report intake. A severe report bans its device id
/// before the response is sent.
pub async fn file_report(
    data: web::Data<AppState>,
    body: web::Json<ReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let content = body.content.as_deref().ok_or(AppError::MissingField("content"))?;
    let reason = body.reason.as_deref().ok_or(AppError::MissingField("reason"))?;
    let device_id = body.device_id.as_deref().ok_or(AppError::MissingField("deviceId"))?;

    let report_id = data
        .ledger
        .file_report(content, reason, device_id, body.app_version.as_deref())?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "reportId": report_id,
    })))
}

/// `GET /api/admin/reports` — moderation overview: the last 50 reports plus
/// aggregate counters.
pub async fn admin_reports(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = data.ledger.stats();
    Ok(HttpResponse::Ok().json(json!({
        "reports": data.ledger.recent(ADMIN_REPORT_WINDOW),
        "totalCount": stats.total,
        "pendingCount": stats.pending,
        "bannedUsersCount": stats.banned_devices,
    })))
}

/// `GET /` — service status snapshot.
pub async fn status(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let snapshot = data.scheduler.snapshot().await?;
    let stats = data.ledger.stats();
    Ok(HttpResponse::Ok().json(json!({
        "message": "gossip-board is running",
        "activeUsers": data.gateway.observer_count(),
        "queueLength": snapshot.queue_length,
        "currentGossip": snapshot.state.active_item(),
        "totalReports": stats.total,
        "bannedUsersCount": stats.banned_devices,
    })))
}
