//! Server-Sent Events adapter over the broadcast gateway. Each connection
//! gets a `current-state` snapshot first, then every fan-out event as an SSE
//! frame. Observers that lag past the channel capacity skip ahead rather
//! than stalling the scheduler.

use std::convert::Infallible;

use actix_web::{web, HttpResponse};
use futures_util::stream::{self, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use gb_core::BroadcastEvent;

use crate::error::ApiError;
use crate::handlers::AppState;

/// `GET /api/stream`
pub async fn events(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // Subscribe before taking the snapshot so nothing falls in the gap.
    let rx = data.gateway.subscribe();
    let snapshot = data.scheduler.snapshot().await?;
    let hello = BroadcastEvent::CurrentState {
        active_gossip: snapshot.state.active_item().cloned(),
        queue_length: snapshot.queue_length,
    };

    let live = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((Ok::<_, Infallible>(frame(&event)), rx)),
                // dropped events are stale countdowns; keep reading
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("sse observer lagged, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    let body = stream::once(async move { Ok::<_, Infallible>(frame(&hello)) }).chain(live);

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body))
}

fn frame(event: &BroadcastEvent) -> web::Bytes {
    // BroadcastEvent serialization cannot fail: plain structs, no maps
    let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    web::Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), json))
}
