//! Observable session state types.

use backend::BackendMessage;
use compact_str::CompactString;

/// Connection progress of the chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No session, or the last session ended in failure.
    #[default]
    Disconnected,
    /// A session is being established.
    Connecting,
    /// The session is live and history is loaded.
    Connected,
}

/// A single chat message projected out of the backend representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Backend-assigned message identifier.
    pub sid: CompactString,
    /// Message text.
    pub body: String,
}

impl ChatMessage {
    /// Create a chat message from a sid and body.
    pub fn new(sid: impl Into<CompactString>, body: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            body: body.into(),
        }
    }
}

impl From<BackendMessage> for ChatMessage {
    fn from(message: BackendMessage) -> Self {
        Self {
            sid: message.sid,
            body: message.body,
        }
    }
}

/// One immutable observation of the session: connection state plus the
/// loaded messages in backend order. Replaced wholesale on every
/// transition, never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Connection progress.
    pub connection_state: ConnectionState,
    /// Loaded messages, oldest first. Empty until history is read and
    /// cleared again on any failure.
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_disconnected_and_empty() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.connection_state, ConnectionState::Disconnected);
        assert!(snapshot.messages.is_empty());
    }

    #[test]
    fn chat_message_from_backend_message() {
        let message = ChatMessage::from(BackendMessage::new("IM123", "hello there"));
        assert_eq!(message, ChatMessage::new("IM123", "hello there"));
    }
}
