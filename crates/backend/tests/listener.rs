//! Tests for the client listener and event forwarder.

use coral_backend::{
    ClientEvent, ClientListener, ClientProperties, ConnectionStatus, ErrorInfo, EventForwarder,
    LogLevel, SynchronizationStatus,
};
use std::time::Duration;

/// A listener that overrides nothing; every notification should be a no-op.
struct Inert;

impl ClientListener for Inert {}

#[test]
fn default_listener_methods_are_noops() {
    let listener = Inert;
    listener.on_synchronization_change(SynchronizationStatus::Completed);
    listener.on_error(ErrorInfo::new(500, "boom"));
    listener.on_conversation_added("CH001");
    listener.on_conversation_updated("CH001");
    listener.on_conversation_deleted("CH001");
    listener.on_conversation_synchronization_change("CH001");
    listener.on_new_message_notification("CH001", "IM001", 7);
    listener.on_added_to_conversation_notification("CH001");
    listener.on_removed_from_conversation_notification("CH001");
    listener.on_notification_subscribed();
    listener.on_notification_failed(ErrorInfo::new(410, "gone"));
    listener.on_connection_state_change(ConnectionStatus::Denied);
    listener.on_token_expired();
    listener.on_token_about_to_expire();
    listener.on_user_updated("alice");
    listener.on_user_subscribed("alice");
    listener.on_user_unsubscribed("alice");
}

#[test]
fn forwarder_forwards_sync_and_error_in_order() {
    let (forwarder, mut rx) = EventForwarder::channel();

    forwarder.on_synchronization_change(SynchronizationStatus::Started);
    forwarder.on_synchronization_change(SynchronizationStatus::Completed);
    forwarder.on_error(ErrorInfo::new(50801, "connection reset"));

    assert_eq!(
        rx.try_recv().unwrap(),
        ClientEvent::SynchronizationChanged(SynchronizationStatus::Started)
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        ClientEvent::SynchronizationChanged(SynchronizationStatus::Completed)
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        ClientEvent::Error(ErrorInfo::new(50801, "connection reset"))
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn forwarder_ignores_uninteresting_notifications() {
    let (forwarder, mut rx) = EventForwarder::channel();

    forwarder.on_conversation_added("CH001");
    forwarder.on_new_message_notification("CH001", "IM001", 0);
    forwarder.on_connection_state_change(ConnectionStatus::Connected);
    forwarder.on_token_about_to_expire();

    assert!(rx.try_recv().is_err());
}

#[test]
fn forwarder_drops_events_after_receiver_closes() {
    let (forwarder, rx) = EventForwarder::channel();
    drop(rx);
    // Must not panic.
    forwarder.on_synchronization_change(SynchronizationStatus::Failed);
}

#[test]
fn default_properties() {
    let props = ClientProperties::default();
    assert_eq!(props.command_timeout, Duration::from_millis(30_000));
    assert_eq!(props.log_level, LogLevel::Verbose);
}

#[test]
fn error_info_display() {
    let info = ErrorInfo::new(20003, "invalid access token");
    assert_eq!(info.to_string(), "[20003] invalid access token");
}
