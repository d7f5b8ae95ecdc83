use crate::generator::GeneratorConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub publishing: PublishingConfig,
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the persisted settings blob.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of samples kept in the broadcast channel for /ws/telemetry (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Generator tick; also the spacing used for backfilled history.
    pub sample_interval_ms: u64,
    /// Default series length for GET /api/history.
    pub backfill_points: usize,
    /// How often to roll for a simulated incoming message.
    pub receive_interval_ms: u64,
    /// Chance per receive tick of injecting a received message.
    pub receive_probability: f64,
    /// How often to roll for a synthetic reception fault.
    pub error_interval_ms: u64,
    /// Chance per error tick of logging a fault entry.
    pub error_probability: f64,
    /// How often to log app stats (ws clients, samples generated) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.storage.path.is_empty(),
            "storage.path must be non-empty"
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.telemetry.sample_interval_ms > 0,
            "telemetry.sample_interval_ms must be > 0, got {}",
            self.telemetry.sample_interval_ms
        );
        anyhow::ensure!(
            self.telemetry.backfill_points > 0,
            "telemetry.backfill_points must be > 0, got {}",
            self.telemetry.backfill_points
        );
        anyhow::ensure!(
            self.telemetry.receive_interval_ms > 0,
            "telemetry.receive_interval_ms must be > 0, got {}",
            self.telemetry.receive_interval_ms
        );
        anyhow::ensure!(
            self.telemetry.error_interval_ms > 0,
            "telemetry.error_interval_ms must be > 0, got {}",
            self.telemetry.error_interval_ms
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.telemetry.receive_probability),
            "telemetry.receive_probability must be in [0, 1], got {}",
            self.telemetry.receive_probability
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.telemetry.error_probability),
            "telemetry.error_probability must be in [0, 1], got {}",
            self.telemetry.error_probability
        );
        anyhow::ensure!(
            self.telemetry.stats_log_interval_secs > 0,
            "telemetry.stats_log_interval_secs must be > 0, got {}",
            self.telemetry.stats_log_interval_secs
        );
        for (name, params) in [
            ("generator.signal_strength", &self.generator.signal_strength),
            ("generator.data_rate", &self.generator.data_rate),
            ("generator.throughput", &self.generator.throughput),
            ("generator.light_intensity", &self.generator.light_intensity),
        ] {
            anyhow::ensure!(
                params.floor <= params.ceiling,
                "{}.floor must be <= ceiling, got {} > {}",
                name,
                params.floor,
                params.ceiling
            );
            anyhow::ensure!(
                params.jitter >= 0.0,
                "{}.jitter must be >= 0, got {}",
                name,
                params.jitter
            );
            anyhow::ensure!(
                (params.floor..=params.ceiling).contains(&params.base),
                "{}.base must be within [floor, ceiling], got {}",
                name,
                params.base
            );
        }
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.generator.max_error_rate),
            "generator.max_error_rate must be in [0, 1], got {}",
            self.generator.max_error_rate
        );
        anyhow::ensure!(
            self.generator.max_packet_loss >= 0.0,
            "generator.max_packet_loss must be >= 0, got {}",
            self.generator.max_packet_loss
        );
        Ok(())
    }
}
