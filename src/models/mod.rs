// Domain models (ported from the shared dashboard state shapes)

mod message;
mod settings;
mod status;
mod telemetry;

pub use message::{Direction, Message, MessageStatus, NewMessage};
pub use settings::{PersistedState, Theme, WifiSettings, WifiSettingsPatch};
pub use status::{StatusPatch, SystemStatus};
pub use telemetry::{AnalyticsSample, SignalSample};

/// Milliseconds since the Unix epoch. A clock before the epoch collapses to 0.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
