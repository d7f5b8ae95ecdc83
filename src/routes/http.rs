// REST handlers: version, status, messages, send, settings, transmission, led,
// history backfill, CSV export

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use super::AppState;
use crate::export::to_csv;
use crate::generator::{self, AnalyticsRange};
use crate::models::{StatusPatch, WifiSettingsPatch};
use crate::version::{NAME, VERSION};

/// Series length cap for GET /api/history.
const MAX_HISTORY_POINTS: usize = 1000;

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/status — current system status snapshot.
pub(super) async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.store.status())
}

/// GET /api/messages — message log, newest first.
pub(super) async fn messages_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.store.messages())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SendRequest {
    pub message: String,
    pub device_id: Option<String>,
}

/// POST /api/send — records a transmitter send; returns the created entry.
pub(super) async fn send_handler(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<SendRequest>,
) -> impl IntoResponse {
    tracing::debug!(
        device_id = req.device_id.as_deref().unwrap_or("-"),
        "send request"
    );
    let message = state.store.record_sent(req.message);
    axum::Json(message)
}

/// POST /api/settings — merges into Wi-Fi settings (persisted).
pub(super) async fn settings_handler(
    State(state): State<AppState>,
    axum::Json(patch): axum::Json<WifiSettingsPatch>,
) -> impl IntoResponse {
    state.store.update_wifi_settings(&patch);
    axum::Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub(super) struct TransmissionRequest {
    pub active: bool,
}

/// POST /api/transmission — start/stop the transmission flag (idempotent).
pub(super) async fn transmission_handler(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<TransmissionRequest>,
) -> impl IntoResponse {
    state.store.set_transmitting(req.active);
    axum::Json(serde_json::json!({ "isTransmitting": req.active }))
}

#[derive(Debug, Deserialize)]
pub(super) struct LedRequest {
    pub on: bool,
}

/// POST /api/led — LED toggle, routed through the status merge.
pub(super) async fn led_handler(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<LedRequest>,
) -> impl IntoResponse {
    state.store.update_status(&StatusPatch {
        led_status: Some(req.on),
        ..Default::default()
    });
    axum::Json(serde_json::json!({ "ledStatus": req.on }))
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub points: Option<usize>,
}

/// GET /api/history?points=N — backfilled sample series ending now, for
/// seeding charts. Each request is a fresh independent sequence.
pub(super) async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let points = query
        .points
        .unwrap_or(state.config.telemetry.backfill_points)
        .clamp(1, MAX_HISTORY_POINTS);
    let mut rng = StdRng::from_os_rng();
    let series = generator::backfill(
        points,
        state.config.telemetry.sample_interval_ms,
        &state.config.generator,
        &mut rng,
    );
    axum::Json(series)
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyticsQuery {
    pub range: Option<AnalyticsRange>,
}

/// GET /api/analytics?range=hour|day|week — throughput, packet loss, and
/// light intensity trend series for the analytics charts. Defaults to hour.
pub(super) async fn analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> impl IntoResponse {
    let range = query.range.unwrap_or(AnalyticsRange::Hour);
    let mut rng = StdRng::from_os_rng();
    let series = generator::analytics_series(range, &state.config.generator, &mut rng);
    axum::Json(series)
}

/// GET /api/export/messages — message log as CSV (dashboard export format).
pub(super) async fn export_messages_handler(State(state): State<AppState>) -> impl IntoResponse {
    match to_csv(&state.store.messages()) {
        Ok(csv) => ([(header::CONTENT_TYPE, "text/csv")], csv).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "csv export failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
