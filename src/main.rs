use anyhow::Result;
use lifihub::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let settings_repo = Arc::new(settings_repo::SettingsRepo::connect(&app_config.storage.path).await?);
    settings_repo.init().await?;
    let persisted = settings_repo.load().await?;
    if persisted.is_some() {
        tracing::info!("Restored persisted settings");
    }

    let (telemetry_tx, _) =
        broadcast::channel::<models::SignalSample>(app_config.publishing.broadcast_capacity);
    let (persist_tx, persist_rx) = mpsc::unbounded_channel();
    let store = Arc::new(store::AppStore::with_persisted(persisted, Some(persist_tx)));

    let writer_handle = worker::spawn_settings_writer(persist_rx, settings_repo.clone());

    let ws_telemetry_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            store: store.clone(),
            tx: telemetry_tx.clone(),
            ws_telemetry_connections: ws_telemetry_connections.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            telemetry: app_config.telemetry.clone(),
            generator: app_config.generator.clone(),
        },
        StdRng::from_os_rng(),
    );

    let app = routes::app(
        store.clone(),
        telemetry_tx,
        ws_telemetry_connections,
        app_config.clone(),
    );
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    // The worker holds its own Arc<AppStore>, so it must exit before the
    // persist channel can close.
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;

    // Dropping the store closes the persist channel; the writer drains and exits.
    drop(store);
    let _ = writer_handle.await;

    Ok(())
}
