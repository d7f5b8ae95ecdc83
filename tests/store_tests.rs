// Store contract tests: merge semantics, bounded log, subscriptions, persistence subset

use lifihub::models::{
    Direction, MessageStatus, NewMessage, StatusPatch, Theme, WifiSettingsPatch,
};
use lifihub::store::{AppStore, MESSAGE_LOG_CAPACITY, StoreEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_defaults_match_dashboard() {
    let store = AppStore::new();
    let status = store.status();
    assert!(status.lifi_connected);
    assert!(status.wifi_connected);
    assert_eq!(status.data_rate, 10.5);
    assert_eq!(status.error_rate, 0.02);
    assert_eq!(status.signal_strength, 85.0);
    assert!(status.led_status);
    assert!(store.messages().is_empty());
    assert!(!store.is_transmitting());
    assert_eq!(store.wifi_settings().ssid, "LiFi-Network");
    assert_eq!(store.wifi_settings().password, "");
    assert_eq!(store.theme(), Theme::Dark);
}

#[test]
fn test_update_status_merges_only_given_fields() {
    let store = AppStore::new();
    store.update_status(&StatusPatch {
        data_rate: Some(12.0),
        ..Default::default()
    });
    let status = store.status();
    assert_eq!(status.data_rate, 12.0);
    assert_eq!(status.signal_strength, 85.0);
    assert!(status.lifi_connected);
}

#[test]
fn test_update_status_applies_values_verbatim_without_clamping() {
    let store = AppStore::new();
    store.update_status(&StatusPatch {
        signal_strength: Some(999.0),
        ..Default::default()
    });
    assert_eq!(store.status().signal_strength, 999.0);
}

#[test]
fn test_message_log_truncates_to_capacity_newest_first() {
    let store = AppStore::new();
    for i in 0..150 {
        store.add_message(NewMessage {
            content: format!("msg-{}", i),
            direction: Direction::Sent,
            status: MessageStatus::Success,
        });
    }
    let messages = store.messages();
    assert_eq!(messages.len(), MESSAGE_LOG_CAPACITY);
    // Newest first: the last added (149) is at index 0, the oldest retained is 50.
    assert_eq!(messages[0].content, "msg-149");
    assert_eq!(messages[99].content, "msg-50");
}

#[test]
fn test_message_ids_unique_and_timestamps_non_decreasing() {
    let store = AppStore::new();
    for _ in 0..200 {
        store.add_message(NewMessage {
            content: "x".into(),
            direction: Direction::Received,
            status: MessageStatus::Success,
        });
    }
    let messages = store.messages();
    let mut ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), messages.len(), "message ids must be unique");
    // Newest-first display order means timestamps are non-increasing here.
    for pair in messages.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[test]
fn test_set_transmitting_is_idempotent() {
    let store = AppStore::new();
    store.set_transmitting(true);
    store.set_transmitting(true);
    assert!(store.is_transmitting());
    store.set_transmitting(false);
    assert!(!store.is_transmitting());
}

#[test]
fn test_update_wifi_settings_merges() {
    let store = AppStore::new();
    store.update_wifi_settings(&WifiSettingsPatch {
        ssid: Some("HomeNet".into()),
        password: None,
    });
    let settings = store.wifi_settings();
    assert_eq!(settings.ssid, "HomeNet");
    assert_eq!(settings.password, "");
    store.update_wifi_settings(&WifiSettingsPatch {
        ssid: None,
        password: Some("hunter2".into()),
    });
    let settings = store.wifi_settings();
    assert_eq!(settings.ssid, "HomeNet");
    assert_eq!(settings.password, "hunter2");
}

#[test]
fn test_toggle_theme_flips() {
    let store = AppStore::new();
    assert_eq!(store.toggle_theme(), Theme::Light);
    assert_eq!(store.toggle_theme(), Theme::Dark);
}

#[test]
fn test_subscribers_notified_synchronously_and_unsubscribe_stops_delivery() {
    let store = AppStore::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let id = store.subscribe(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });

    store.set_transmitting(true);
    store.update_status(&StatusPatch::default());
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    store.unsubscribe(id);
    store.set_transmitting(false);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_subscriber_sees_event_kind() {
    let store = AppStore::new();
    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let events_clone = events.clone();
    store.subscribe(move |event| {
        events_clone.lock().unwrap().push(event);
    });

    store.add_message(NewMessage {
        content: "ping".into(),
        direction: Direction::Sent,
        status: MessageStatus::Pending,
    });
    store.toggle_theme();

    let seen = events.lock().unwrap().clone();
    assert_eq!(seen, vec![StoreEvent::MessageAdded, StoreEvent::ThemeToggled]);
}

#[test]
fn test_persisted_subset_excludes_ephemeral_state() {
    let store = AppStore::new();
    store.set_transmitting(true);
    store.add_message(NewMessage {
        content: "ephemeral".into(),
        direction: Direction::Sent,
        status: MessageStatus::Success,
    });
    store.update_wifi_settings(&WifiSettingsPatch {
        ssid: Some("X".into()),
        password: Some("Y".into()),
    });
    let persisted = store.persisted();
    assert_eq!(persisted.wifi_settings.ssid, "X");
    assert_eq!(persisted.wifi_settings.password, "Y");
    assert_eq!(persisted.theme, Theme::Dark);
}

#[test]
fn test_persist_channel_receives_only_persisted_mutations() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let store = AppStore::with_persisted(None, Some(tx));

    store.set_transmitting(true);
    store.update_status(&StatusPatch::default());
    assert!(rx.try_recv().is_err(), "ephemeral mutations must not persist");

    store.update_wifi_settings(&WifiSettingsPatch {
        ssid: Some("X".into()),
        password: None,
    });
    let sent = rx.try_recv().expect("settings mutation persists");
    assert_eq!(sent.wifi_settings.ssid, "X");

    store.toggle_theme();
    let sent = rx.try_recv().expect("theme mutation persists");
    assert_eq!(sent.theme, Theme::Light);
}

#[test]
fn test_transmit_send_stop_scenario() {
    let store = AppStore::new();
    store.set_transmitting(true);
    store.record_sent("Hello");
    store.set_transmitting(false);

    let messages = store.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[0].direction, Direction::Sent);
    assert_eq!(messages[0].status, MessageStatus::Success);
    assert!(!store.is_transmitting());
}
