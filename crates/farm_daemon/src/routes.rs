use crate::map::MapView;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method},
    response::{
        sse::{Event, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use farm_control::{Session, SessionView};
use farm_core::{ActionKind, EventEnvelope, ZoneId};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: ActionKind,
}

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, HeaderValue::from_static("http://localhost:5173"))
}

pub fn make_router_with_cors(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/snapshot", get(snapshot_handler))
        .route("/api/v1/map", get(map_handler))
        .route("/api/v1/stream", get(stream_handler))
        .route("/api/v1/zones/:zone_id/select", post(select_handler))
        .route("/api/v1/zones/:zone_id/click", post(click_handler))
        .route("/api/v1/zones/:zone_id/actions", post(zone_action_handler))
        .route("/api/v1/controls", post(controls_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run one mutation under the lock, then publish whatever it emitted.
/// A rejected mutation (unknown zone, no selection) still answers with the
/// unchanged snapshot.
fn mutate(app_state: &AppState, f: impl FnOnce(&mut Session) -> bool) -> Json<SessionView> {
    let (view, events) = {
        let mut session = app_state.session.lock();
        f(&mut session);
        (session.view(), session.drain_events())
    };
    app_state.publish(events);
    Json(view)
}

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let session = app_state.session.lock();
    Json(serde_json::json!({
        "content_version": session.state().meta.content_version,
        "schema_version": session.state().meta.schema_version,
        "loading": session.is_loading(),
        "data": session.status(),
    }))
}

pub async fn snapshot_handler(State(app_state): State<AppState>) -> Json<SessionView> {
    Json(app_state.session.lock().view())
}

pub async fn map_handler(State(app_state): State<AppState>) -> Json<MapView> {
    Json(app_state.map.as_ref().clone())
}

pub async fn select_handler(
    State(app_state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Json<SessionView> {
    let zone_id = ZoneId(zone_id);
    mutate(&app_state, |session| session.select_zone(&zone_id))
}

pub async fn click_handler(
    State(app_state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Json<SessionView> {
    let zone_id = ZoneId(zone_id);
    mutate(&app_state, |session| session.click_zone(&zone_id))
}

pub async fn zone_action_handler(
    State(app_state): State<AppState>,
    Path(zone_id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Json<SessionView> {
    let zone_id = ZoneId(zone_id);
    mutate(&app_state, |session| {
        session.act_on_zone(&zone_id, request.action)
    })
}

pub async fn controls_handler(
    State(app_state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Json<SessionView> {
    mutate(&app_state, |session| session.control_action(request.action))
}

pub async fn stream_handler(
    State(app_state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app_state.event_tx.subscribe();
    let session = app_state.session.clone();

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(5));
        heartbeat.tick().await; // discard the immediate first tick
        let mut flush = tokio::time::interval(Duration::from_millis(50));
        flush.tick().await; // discard the immediate first tick
        let mut pending: Vec<EventEnvelope> = Vec::new();
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(events) => pending.extend(events),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "event stream subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = flush.tick() => {
                    if !pending.is_empty() {
                        let data = serde_json::to_string(&pending).unwrap_or_default();
                        pending.clear();
                        yield Ok(Event::default().data(data));
                    }
                }
                _ = heartbeat.tick() => {
                    let loading = session.lock().is_loading();
                    let hb = serde_json::json!({"heartbeat": true, "loading": loading});
                    yield Ok(Event::default().data(hb.to_string()));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
