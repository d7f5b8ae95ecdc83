// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::models::SignalSample;
use crate::store::AppStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<AppStore>,
    pub(crate) telemetry_tx: broadcast::Sender<SignalSample>,
    pub(crate) ws_telemetry_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    store: Arc<AppStore>,
    telemetry_tx: broadcast::Sender<SignalSample>,
    ws_telemetry_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        store,
        telemetry_tx,
        ws_telemetry_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "Li-Fi + Wi-Fi demo hub" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/status", get(http::status_handler)) // GET /api/status
        .route("/api/messages", get(http::messages_handler)) // GET /api/messages
        .route("/api/send", post(http::send_handler)) // POST /api/send
        .route("/api/settings", post(http::settings_handler)) // POST /api/settings
        .route("/api/transmission", post(http::transmission_handler)) // POST /api/transmission
        .route("/api/led", post(http::led_handler)) // POST /api/led
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/api/analytics", get(http::analytics_handler)) // GET /api/analytics
        .route("/api/export/messages", get(http::export_messages_handler)) // GET /api/export/messages
        .route("/ws/telemetry", get(ws::ws_telemetry)) // WS /ws/telemetry
        .route("/ws/events", get(ws::ws_events)) // WS /ws/events
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
