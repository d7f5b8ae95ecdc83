// Simulated signal reading pushed to charts and the status store

use serde::{Deserialize, Serialize};

/// One telemetry reading. Immutable once produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Percent, clamped to the configured [floor, ceiling] within [0, 100].
    pub signal_strength: f64,
    /// Mbps, never negative.
    pub data_rate: f64,
    /// Fraction in [0, 1]; independent noise, not a walk.
    pub error_rate: f64,
}

/// One analytics reading for the hour/day/week trend charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Mbps.
    pub throughput: f64,
    /// Percent lost; independent noise, not a walk.
    pub packet_loss: f64,
    /// Percent of full brightness.
    pub light_intensity: f64,
}
