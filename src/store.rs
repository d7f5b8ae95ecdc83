// Shared application state store: merge-style mutations, bounded message log,
// synchronous subscriber notification, and selective persistence.
//
// One instance is built at startup and handed around by Arc. A single mutex
// guards the state so the prepend+truncate step on the message log is atomic
// even under true concurrency.

use crate::models::{
    Direction, Message, MessageStatus, NewMessage, PersistedState, StatusPatch, SystemStatus,
    Theme, WifiSettings, WifiSettingsPatch, now_millis,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Most recent entries kept in the message log; oldest are evicted first.
pub const MESSAGE_LOG_CAPACITY: usize = 100;

/// What changed; subscribers query the store for current values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    StatusUpdated,
    MessageAdded,
    TransmissionChanged,
    WifiSettingsUpdated,
    ThemeToggled,
}

type SubscriberFn = dyn Fn(StoreEvent) + Send + Sync;

/// Handle returned by [`AppStore::subscribe`]; pass to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct StoreState {
    status: SystemStatus,
    messages: VecDeque<Message>,
    is_transmitting: bool,
    settings: WifiSettings,
    theme: Theme,
    /// High-water mark so message timestamps never decrease in insertion order.
    last_timestamp_ms: u64,
}

struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Arc<SubscriberFn>)>,
}

pub struct AppStore {
    state: Mutex<StoreState>,
    subscribers: Mutex<Subscribers>,
    /// Persisted subset goes out on every persisted-field mutation; a writer
    /// task owns the actual storage (store itself performs no I/O).
    persist_tx: Option<mpsc::UnboundedSender<PersistedState>>,
}

impl AppStore {
    /// Fresh store with hard-coded defaults and no persistence.
    pub fn new() -> Self {
        Self::with_persisted(None, None)
    }

    /// Restores theme and Wi-Fi settings from a previously persisted blob;
    /// everything else starts at defaults.
    pub fn with_persisted(
        persisted: Option<PersistedState>,
        persist_tx: Option<mpsc::UnboundedSender<PersistedState>>,
    ) -> Self {
        let persisted = persisted.unwrap_or_default();
        Self {
            state: Mutex::new(StoreState {
                status: SystemStatus::default(),
                messages: VecDeque::new(),
                is_transmitting: false,
                settings: persisted.wifi_settings,
                theme: persisted.theme,
                last_timestamp_ms: 0,
            }),
            subscribers: Mutex::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            }),
            persist_tx,
        }
    }

    // --- reads ---

    pub fn status(&self) -> SystemStatus {
        self.lock_state().status.clone()
    }

    /// Message log, newest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().messages.iter().cloned().collect()
    }

    pub fn is_transmitting(&self) -> bool {
        self.lock_state().is_transmitting
    }

    pub fn wifi_settings(&self) -> WifiSettings {
        self.lock_state().settings.clone()
    }

    pub fn theme(&self) -> Theme {
        self.lock_state().theme
    }

    /// The subset of state that survives a restart.
    pub fn persisted(&self) -> PersistedState {
        let state = self.lock_state();
        PersistedState {
            theme: state.theme,
            wifi_settings: state.settings.clone(),
        }
    }

    // --- mutations (infallible; merge semantics, no validation) ---

    /// Shallow-merges the patch into the current status. Values are applied
    /// verbatim; clamping is the generator's job, not the store's.
    pub fn update_status(&self, patch: &StatusPatch) {
        {
            let mut state = self.lock_state();
            patch.apply_to(&mut state.status);
        }
        self.notify(StoreEvent::StatusUpdated);
    }

    /// Assigns a fresh id and timestamp, prepends, truncates to capacity.
    /// Returns the stored entry.
    pub fn add_message(&self, input: NewMessage) -> Message {
        let message = {
            let mut state = self.lock_state();
            let timestamp = now_millis().max(state.last_timestamp_ms);
            state.last_timestamp_ms = timestamp;
            let message = Message {
                id: Uuid::new_v4().to_string(),
                content: input.content,
                timestamp,
                direction: input.direction,
                status: input.status,
            };
            state.messages.push_front(message.clone());
            state.messages.truncate(MESSAGE_LOG_CAPACITY);
            message
        };
        self.notify(StoreEvent::MessageAdded);
        message
    }

    /// Records a transmitter send with `direction: sent, status: success`.
    pub fn record_sent(&self, content: impl Into<String>) -> Message {
        self.add_message(NewMessage {
            content: content.into(),
            direction: Direction::Sent,
            status: MessageStatus::Success,
        })
    }

    /// Unconditional replace; setting the current value again is a no-op
    /// apart from the subscriber notification.
    pub fn set_transmitting(&self, flag: bool) {
        self.lock_state().is_transmitting = flag;
        self.notify(StoreEvent::TransmissionChanged);
    }

    /// Shallow-merges into the Wi-Fi settings; the result is persisted.
    pub fn update_wifi_settings(&self, patch: &WifiSettingsPatch) {
        {
            let mut state = self.lock_state();
            patch.apply_to(&mut state.settings);
        }
        self.persist();
        self.notify(StoreEvent::WifiSettingsUpdated);
    }

    /// Flips light/dark; the result is persisted. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut state = self.lock_state();
            state.theme = state.theme.toggled();
            state.theme
        };
        self.persist();
        self.notify(StoreEvent::ThemeToggled);
        theme
    }

    // --- subscriptions ---

    /// Registers a callback invoked synchronously after every mutation.
    pub fn subscribe(&self, callback: impl Fn(StoreEvent) + Send + Sync + 'static) -> SubscriberId {
        let mut subs = self.lock_subscribers();
        let id = subs.next_id;
        subs.next_id += 1;
        subs.entries.push((id, Arc::new(callback)));
        SubscriberId(id)
    }

    /// Removes a subscriber; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.lock_subscribers().entries.retain(|(i, _)| *i != id.0);
    }

    fn notify(&self, event: StoreEvent) {
        // Callbacks run outside the subscriber lock so they may re-enter the store.
        let callbacks: Vec<Arc<SubscriberFn>> = self
            .lock_subscribers()
            .entries
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    fn persist(&self) {
        if let Some(tx) = &self.persist_tx {
            // Writer gone means we are shutting down; nothing useful to do.
            let _ = tx.send(self.persisted());
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Subscribers> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
