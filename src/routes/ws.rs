// WebSocket handlers: telemetry push and the inbound event channel

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::{Direction, MessageStatus, NewMessage, SignalSample};
use crate::store::AppStore;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_telemetry connection count on drop (connect = +1, drop = -1).
struct WsTelemetryGuard(Arc<AtomicUsize>);

impl Drop for WsTelemetryGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_telemetry(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.telemetry_tx.clone();
    let conn_count = state.ws_telemetry_connections.clone();
    let store = state.store.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = tx.subscribe();
        if let Err(e) = stream_telemetry(socket, &mut rx, conn_count, store).await {
            tracing::info!("Telemetry stream error: {}", e);
        }
    })
}

async fn stream_telemetry(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<SignalSample>,
    conn_count: Arc<AtomicUsize>,
    store: Arc<AppStore>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsTelemetryGuard(conn_count);
    tracing::info!("Client connected to telemetry stream");

    let welcome = serde_json::json!({ "type": "status", "systemStatus": store.status() });
    let welcome_json = serde_json::to_string(&welcome)?;
    let r = timeout(
        WS_SEND_TIMEOUT,
        socket.send(Message::Text(welcome_json.into())),
    )
    .await;
    if r.is_err() || r.unwrap_or(Ok(())).is_err() {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(sample) => {
                        let json = serde_json::to_string(&sample)?;
                        let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                        if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/telemetry client lagged, skipped {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Inbound push event shape: `{deviceId?, message}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundEvent {
    device_id: Option<String>,
    message: String,
}

pub(super) async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let store = state.store.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = receive_events(socket, store).await {
            tracing::info!("Event stream error: {}", e);
        }
    })
}

/// Translates each delivered `{deviceId?, message}` frame into a received
/// message log entry. Malformed frames are logged and dropped (best effort).
async fn receive_events(mut socket: WebSocket, store: Arc<AppStore>) -> anyhow::Result<()> {
    tracing::info!("Client connected to event stream");
    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            frame = socket.recv() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<InboundEvent>(&text) {
                            Ok(event) => {
                                tracing::debug!(
                                    device_id = event.device_id.as_deref().unwrap_or("-"),
                                    "inbound event"
                                );
                                store.add_message(NewMessage {
                                    content: event.message,
                                    direction: Direction::Received,
                                    status: MessageStatus::Success,
                                });
                            }
                            Err(e) => {
                                tracing::debug!(error = %e, "dropping malformed event frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary ignored
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "event socket error");
                        break;
                    }
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
