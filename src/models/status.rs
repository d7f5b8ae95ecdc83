// System status singleton and its merge patch

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub lifi_connected: bool,
    pub wifi_connected: bool,
    pub data_rate: f64,
    pub error_rate: f64,
    pub signal_strength: f64,
    pub led_status: bool,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            lifi_connected: true,
            wifi_connected: true,
            data_rate: 10.5,
            error_rate: 0.02,
            signal_strength: 85.0,
            led_status: true,
        }
    }
}

/// Partial status update. Only `Some` fields replace the current value;
/// the store applies it verbatim and performs no clamping of its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    pub lifi_connected: Option<bool>,
    pub wifi_connected: Option<bool>,
    pub data_rate: Option<f64>,
    pub error_rate: Option<f64>,
    pub signal_strength: Option<f64>,
    pub led_status: Option<bool>,
}

impl StatusPatch {
    pub fn apply_to(&self, status: &mut SystemStatus) {
        if let Some(v) = self.lifi_connected {
            status.lifi_connected = v;
        }
        if let Some(v) = self.wifi_connected {
            status.wifi_connected = v;
        }
        if let Some(v) = self.data_rate {
            status.data_rate = v;
        }
        if let Some(v) = self.error_rate {
            status.error_rate = v;
        }
        if let Some(v) = self.signal_strength {
            status.signal_strength = v;
        }
        if let Some(v) = self.led_status {
            status.led_status = v;
        }
    }
}
