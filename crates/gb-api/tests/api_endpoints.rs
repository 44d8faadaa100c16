//! End-to-end handler tests over an in-memory stack: real engine services,
//! real broadcast channel, no network.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};

use gb_api::handlers::AppState;
use gb_broadcast_memory::BroadcastChannel;
use gb_core::BroadcastGateway;
use gb_engine::{scheduler, ContentPolicy, ModerationLedger, QuotaTracker, SubmissionPipeline};

fn fresh_state() -> web::Data<AppState> {
    let gateway: Arc<dyn BroadcastGateway> = Arc::new(BroadcastChannel::default());
    let handle = scheduler::spawn(gateway.clone());
    let ledger = Arc::new(ModerationLedger::new());
    let quota = Arc::new(QuotaTracker::default());
    let pipeline = SubmissionPipeline::new(
        ledger.clone(),
        quota.clone(),
        ContentPolicy::standard(),
        handle.clone(),
    );
    web::Data::new(AppState { pipeline, quota, ledger, scheduler: handle, gateway })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(gb_api::configure_routes),
        )
        .await
    };
}

/// POST a JSON body; yields `(status, body)`.
macro_rules! post_json {
    ($app:expr, $path:expr, $body:expr) => {{
        let req = test::TestRequest::post().uri($path).set_json($body).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

/// GET a path; yields `(status, body)`.
macro_rules! get_json {
    ($app:expr, $path:expr) => {{
        let req = test::TestRequest::get().uri($path).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn submit_three_then_quota_exceeded() {
    let state = fresh_state();
    let app = test_app!(state);

    for expected in 1..=3 {
        let (status, body) =
            post_json!(app, "/api/gossip", json!({ "content": "안녕", "deviceId": "d1" }));
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["userUsage"], expected);
    }

    let (status, body) =
        post_json!(app, "/api/gossip", json!({ "content": "또", "deviceId": "d1" }));
    assert_eq!(status, 429);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn submit_contact_info_rejected_with_reason() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) = post_json!(
        app,
        "/api/gossip",
        json!({ "content": "010-1234-5678", "deviceId": "d1" })
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "may contain contact information");
}

#[actix_web::test]
async fn submit_without_device_id_is_400() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) = post_json!(app, "/api/gossip", json!({ "content": "안녕" }));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("deviceId"));
}

#[actix_web::test]
async fn severe_report_bans_device_everywhere() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) = post_json!(
        app,
        "/api/report",
        json!({
            "content": "이상한 내용",
            "reason": "폭력적 내용",
            "deviceId": "d9",
            "appVersion": "1.2.0",
        })
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["reportId"].is_string());

    // every submission from the banned device now fails with 403
    let (status, _) =
        post_json!(app, "/api/gossip", json!({ "content": "안녕", "deviceId": "d9" }));
    assert_eq!(status, 403);

    // and so does the usage endpoint
    let (status, _) = get_json!(app, "/api/usage/d9");
    assert_eq!(status, 403);
}

#[actix_web::test]
async fn report_missing_reason_is_400() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) =
        post_json!(app, "/api/report", json!({ "content": "내용", "deviceId": "d1" }));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("reason"));
}

#[actix_web::test]
async fn usage_endpoint_tracks_submissions() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) = get_json!(app, "/api/usage/d1");
    assert_eq!(status, 200);
    assert_eq!(body["usage"], 0);
    assert_eq!(body["remaining"], 3);
    // resetTime parses as RFC 3339
    let reset = body["resetTime"].as_str().unwrap();
    chrono::DateTime::parse_from_rfc3339(reset).unwrap();

    post_json!(app, "/api/gossip", json!({ "content": "안녕", "deviceId": "d1" }));
    let (_, body) = get_json!(app, "/api/usage/d1");
    assert_eq!(body["usage"], 1);
    assert_eq!(body["remaining"], 2);
}

#[actix_web::test]
async fn admin_overview_lists_reports_and_counts() {
    let state = fresh_state();
    let app = test_app!(state);

    post_json!(
        app,
        "/api/report",
        json!({ "content": "하나", "reason": "기타", "deviceId": "d1" })
    );
    post_json!(
        app,
        "/api/report",
        json!({ "content": "둘", "reason": "폭력적 내용", "deviceId": "d2" })
    );

    let (status, body) = get_json!(app, "/api/admin/reports");
    assert_eq!(status, 200);
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["pendingCount"], 2);
    assert_eq!(body["bannedUsersCount"], 1);
    assert_eq!(body["reports"].as_array().unwrap().len(), 2);
    assert_eq!(body["reports"][1]["content"], "둘");
}

/// Pull the next SSE frame out of a streaming response body.
async fn next_frame(body: &mut actix_web::body::BoxBody) -> String {
    use actix_web::body::MessageBody;

    let bytes = std::future::poll_fn(|cx| std::pin::Pin::new(&mut *body).poll_next(cx))
        .await
        .expect("stream should yield a frame")
        .expect("stream frame should not error");
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn sse_stream_opens_with_current_state_then_live_events() {
    let state = fresh_state();
    state.pipeline.submit("첫 소문", "d1").await.unwrap();

    let resp = gb_api::stream::events(state.clone()).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let mut body = resp.into_body();

    // late joiners synchronize from the snapshot, before any live event
    let first = next_frame(&mut body).await;
    assert!(first.starts_with("event: current-state\n"), "got: {first}");
    assert!(first.contains("첫 소문"));
    assert!(first.contains("\"queueLength\":0"));

    // a broadcast published after connect arrives as the next frame
    state
        .gateway
        .publish(gb_core::BroadcastEvent::NewGossip { queue_length: 1, user_usage: 2 });
    let second = next_frame(&mut body).await;
    assert!(second.starts_with("event: new-gossip\n"), "got: {second}");
    assert!(second.contains("\"userUsage\":2"));
}

#[actix_web::test]
async fn status_snapshot_reflects_active_gossip() {
    let state = fresh_state();
    let app = test_app!(state);

    let (status, body) = get_json!(app, "/");
    assert_eq!(status, 200);
    assert_eq!(body["queueLength"], 0);
    assert!(body["currentGossip"].is_null());
    assert_eq!(body["totalReports"], 0);

    post_json!(app, "/api/gossip", json!({ "content": "첫 소문", "deviceId": "d1" }));

    let (_, body) = get_json!(app, "/");
    assert_eq!(body["currentGossip"]["content"], "첫 소문");
    assert_eq!(body["queueLength"], 0);
}
