// Message log entries (transmitter sends, simulated receives, injected faults)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Success,
    Error,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique across the process lifetime (UUID v4).
    pub id: String,
    pub content: String,
    /// Milliseconds since the Unix epoch; non-decreasing in insertion order.
    pub timestamp: u64,
    pub direction: Direction,
    pub status: MessageStatus,
}

/// Caller-provided part of a message; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub direction: Direction,
    pub status: MessageStatus,
}
