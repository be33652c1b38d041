//! Messaging backend interface boundary.
//!
//! The conversations backend (the SDK that owns the wire protocol,
//! connection pooling and retries) is a black box to the rest of coral.
//! This crate pins down the surface the session layer calls into: client
//! creation, the client notification listener, conversation lookup and
//! history reads. Backends implement the three traits here; everything
//! else consumes them.

use compact_str::CompactString;
use std::future::Future;
use std::time::Duration;

pub use listener::{ClientEvent, ClientListener, EventForwarder};

pub mod listener;

/// Opaque error description reported by the backend.
///
/// Carries whatever the backend knows about the failure. Log-only: the
/// session layer never surfaces this to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Backend-specific error code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl ErrorInfo {
    /// Create an error info from a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Backend-internal log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No backend logging.
    Silent,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational.
    Info,
    /// Debug detail.
    Debug,
    /// Everything the backend can emit.
    Verbose,
}

/// Configuration handed to the backend at client creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProperties {
    /// Budget for a single backend command. Enforced by the backend, not
    /// by the caller.
    pub command_timeout: Duration,
    /// Backend log verbosity.
    pub log_level: LogLevel,
}

impl Default for ClientProperties {
    /// 30 second command timeout, verbose backend logging.
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_millis(30_000),
            log_level: LogLevel::Verbose,
        }
    }
}

/// Client readiness signal. The client must report [`Completed`] before
/// any conversation can be joined.
///
/// [`Completed`]: SynchronizationStatus::Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynchronizationStatus {
    /// Synchronization has begun.
    Started,
    /// Conversation list is available, users still loading.
    ConversationsCompleted,
    /// Client is fully synchronized.
    Completed,
    /// Synchronization failed; the client is unusable.
    Failed,
}

/// Transport-level connection state notification. Delivered to listeners
/// but not consumed by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Transport is connecting.
    Connecting,
    /// Transport is connected.
    Connected,
    /// Transport lost its connection.
    Disconnected,
    /// Connection was refused.
    Denied,
    /// Transport-level error.
    Error,
}

/// A message as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendMessage {
    /// Backend-assigned message identifier.
    pub sid: CompactString,
    /// Message text.
    pub body: String,
}

impl BackendMessage {
    /// Create a backend message from a sid and body.
    pub fn new(sid: impl Into<CompactString>, body: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            body: body.into(),
        }
    }
}

/// A conversations backend.
///
/// Methods use RPITIT for async without boxing.
pub trait Backend: Send + Sync {
    /// The client handle this backend produces.
    type Client: Client;

    /// Create and start a client for the given auth token.
    ///
    /// Resolves once the backend has accepted or rejected the token;
    /// readiness is reported separately through the client listener.
    fn create_client(
        &self,
        token: &str,
        properties: &ClientProperties,
    ) -> impl Future<Output = Result<Self::Client, ErrorInfo>> + Send;
}

/// A live backend client.
pub trait Client: Send + Sync {
    /// The conversation handle this client produces.
    type Conversation: Conversation;

    /// Register a listener for client-level notifications.
    ///
    /// There is no corresponding removal; listeners live as long as the
    /// client does.
    fn add_listener(&self, listener: Box<dyn ClientListener>);

    /// Look up a conversation by its unique name.
    fn conversation(
        &self,
        unique_name: &str,
    ) -> impl Future<Output = Result<Self::Conversation, ErrorInfo>> + Send;
}

/// A joined conversation.
pub trait Conversation: Send + Sync {
    /// Fetch the most recent `count` messages, oldest first.
    fn last_messages(
        &self,
        count: usize,
    ) -> impl Future<Output = Result<Vec<BackendMessage>, ErrorInfo>> + Send;
}
