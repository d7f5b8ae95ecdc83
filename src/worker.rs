// Background telemetry worker. Sample generation runs in the worker;
// persistence of the settings blob runs in a dedicated writer task (channel).

use crate::config::TelemetryConfig;
use crate::generator::{self, GeneratorConfig};
use crate::models::{Direction, MessageStatus, NewMessage, PersistedState, SignalSample, StatusPatch};
use crate::settings_repo::SettingsRepo;
use crate::store::AppStore;
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Duration, Instant, interval};

/// Rate limit for "no receivers" logging (avoid a line every tick when no one is on /ws/telemetry)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Canned payloads for simulated incoming messages.
const RECEIVED_MESSAGES: [&str; 4] = [
    "Status update received",
    "Sensor data: 23.5\u{b0}C",
    "Connection heartbeat",
    "Configuration sync complete",
];

/// Synthetic reception faults, recorded as error entries in the message log.
const RECEPTION_FAULTS: [(&str, &str); 3] = [
    ("Checksum Error", "Data integrity check failed"),
    ("Missed Bits", "Signal interruption detected"),
    ("Sync Loss", "Temporary synchronization loss"),
];

/// Store, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub store: Arc<AppStore>,
    pub tx: broadcast::Sender<SignalSample>,
    pub ws_telemetry_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and simulation config.
pub struct WorkerConfig {
    pub telemetry: TelemetryConfig,
    pub generator: GeneratorConfig,
}

/// Spawns the background task that receives persisted-state updates from the
/// store and writes them to SQLite. Coalesces bursts to the latest value.
/// When the store drops its sender, this task writes the final state and exits.
pub fn spawn_settings_writer(
    mut write_rx: mpsc::UnboundedReceiver<PersistedState>,
    settings_repo: Arc<SettingsRepo>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(mut state) = write_rx.recv().await {
            // Only the last value matters; drain anything queued behind it.
            while let Ok(newer) = write_rx.try_recv() {
                state = newer;
            }
            if let Err(e) = settings_repo.save(&state).await {
                tracing::warn!(error = %e, "settings writer: save failed");
            } else {
                tracing::debug!(operation = "save_settings", "Settings persisted");
            }
        }
        tracing::debug!("Settings writer shutting down");
    })
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig, mut rng: StdRng) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        store,
        tx,
        ws_telemetry_connections,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        telemetry,
        generator: generator_config,
    } = config;

    tokio::spawn(async move {
        let mut sample_tick = interval(Duration::from_millis(telemetry.sample_interval_ms));
        sample_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut receive_tick = interval(Duration::from_millis(telemetry.receive_interval_ms));
        receive_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut error_tick = interval(Duration::from_millis(telemetry.error_interval_ms));
        error_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(telemetry.stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut previous: Option<SignalSample> = None;
        let mut samples_generated: u64 = 0;
        let mut messages_injected: u64 = 0;
        let mut faults_injected: u64 = 0;
        let mut last_no_receivers_warn: Option<Instant> = None;

        let worker_span = tracing::span!(
            tracing::Level::DEBUG,
            "worker",
            sample_interval_ms = telemetry.sample_interval_ms
        );
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = sample_tick.tick() => {
                    let sample = generator::next_sample(previous.as_ref(), &generator_config, &mut rng);
                    store.update_status(&StatusPatch {
                        signal_strength: Some(sample.signal_strength),
                        data_rate: Some(sample.data_rate),
                        error_rate: Some(sample.error_rate),
                        ..StatusPatch::default()
                    });
                    samples_generated += 1;

                    if tx.send(sample.clone()).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_sample",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }
                    previous = Some(sample);
                }
                _ = receive_tick.tick() => {
                    if rng.random::<f64>() < telemetry.receive_probability {
                        let content = RECEIVED_MESSAGES[rng.random_range(0..RECEIVED_MESSAGES.len())];
                        store.add_message(NewMessage {
                            content: content.into(),
                            direction: Direction::Received,
                            status: MessageStatus::Success,
                        });
                        messages_injected += 1;
                    }
                }
                _ = error_tick.tick() => {
                    if rng.random::<f64>() < telemetry.error_probability {
                        let (fault, details) =
                            RECEPTION_FAULTS[rng.random_range(0..RECEPTION_FAULTS.len())];
                        store.add_message(NewMessage {
                            content: format!("{}: {}", fault, details),
                            direction: Direction::Received,
                            status: MessageStatus::Error,
                        });
                        faults_injected += 1;
                    }
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_telemetry_clients =
                            ws_telemetry_connections.load(std::sync::atomic::Ordering::Relaxed),
                        samples_generated,
                        messages_injected,
                        faults_injected,
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    })
}
