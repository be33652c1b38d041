//! Client notification listener and the event-forwarding adapter.
//!
//! Backends deliver a wide fan of per-client notifications. The session
//! layer cares about exactly two of them: synchronization changes and
//! client-level errors. [`ClientListener`] gives every notification kind
//! an explicit no-op default so adapters override only what they consume,
//! and [`EventForwarder`] collapses the interesting kinds into a single
//! tagged [`ClientEvent`] stream.

use crate::{ConnectionStatus, ErrorInfo, SynchronizationStatus};
use tokio::sync::mpsc;

/// Listener for client-level backend notifications.
///
/// Every method defaults to a no-op. Backends invoke these from their own
/// threads, so implementations must be thread-safe.
pub trait ClientListener: Send + Sync {
    /// Client synchronization status changed.
    fn on_synchronization_change(&self, _status: SynchronizationStatus) {}

    /// A client-level error occurred.
    fn on_error(&self, _error: ErrorInfo) {}

    /// A conversation became visible to this client.
    fn on_conversation_added(&self, _conversation_sid: &str) {}

    /// A visible conversation changed.
    fn on_conversation_updated(&self, _conversation_sid: &str) {}

    /// A visible conversation was deleted.
    fn on_conversation_deleted(&self, _conversation_sid: &str) {}

    /// A conversation's own synchronization state changed.
    fn on_conversation_synchronization_change(&self, _conversation_sid: &str) {}

    /// Push notification for a new message.
    fn on_new_message_notification(
        &self,
        _conversation_sid: &str,
        _message_sid: &str,
        _message_index: i64,
    ) {
    }

    /// Push notification that this user was added to a conversation.
    fn on_added_to_conversation_notification(&self, _conversation_sid: &str) {}

    /// Push notification that this user was removed from a conversation.
    fn on_removed_from_conversation_notification(&self, _conversation_sid: &str) {}

    /// Push notification registration succeeded.
    fn on_notification_subscribed(&self) {}

    /// Push notification registration failed.
    fn on_notification_failed(&self, _error: ErrorInfo) {}

    /// Transport connection state changed.
    fn on_connection_state_change(&self, _status: ConnectionStatus) {}

    /// The auth token expired.
    fn on_token_expired(&self) {}

    /// The auth token is about to expire.
    fn on_token_about_to_expire(&self) {}

    /// A subscribed user changed.
    fn on_user_updated(&self, _identity: &str) {}

    /// A user became subscribed.
    fn on_user_subscribed(&self, _identity: &str) {}

    /// A user is no longer subscribed.
    fn on_user_unsubscribed(&self, _identity: &str) {}
}

/// The client notifications the session layer consumes, as one tagged
/// stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Client synchronization status changed.
    SynchronizationChanged(SynchronizationStatus),
    /// A client-level error occurred.
    Error(ErrorInfo),
}

/// Adapter from [`ClientListener`] callbacks to a [`ClientEvent`] channel.
///
/// Forwards synchronization changes and errors; every other notification
/// falls through to the trait's no-op defaults. Send failures are ignored
/// since a dropped receiver just means nobody is listening anymore.
pub struct EventForwarder {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl EventForwarder {
    /// Create a forwarder that sends into the given channel.
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    /// Create a forwarder together with the receiving half of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ClientListener for EventForwarder {
    fn on_synchronization_change(&self, status: SynchronizationStatus) {
        let _ = self.tx.send(ClientEvent::SynchronizationChanged(status));
    }

    fn on_error(&self, error: ErrorInfo) {
        let _ = self.tx.send(ClientEvent::Error(error));
    }
}
