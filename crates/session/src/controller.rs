//! Session controller: drives the connect/synchronize/join/load sequence.

use crate::error::SessionError;
use crate::snapshot::{ChatMessage, ConnectionState, SessionSnapshot};
use crate::state::StateStore;
use backend::{
    Backend, Client, ClientEvent, ClientProperties, Conversation, EventForwarder,
    SynchronizationStatus,
};
use compact_str::CompactString;
use futures_core::Stream;
use std::sync::{Arc, Mutex};

/// How many of the most recent messages are read when a conversation is
/// joined.
pub const MESSAGE_READ_COUNT: usize = 100;

/// Manages one chat session at a time against a conversations backend.
///
/// [`connect`] publishes a Connecting snapshot and returns immediately;
/// all further progress arrives through backend notifications and is
/// published to the controller's [`StateStore`]. A second `connect`
/// supersedes the first: identity is rebound wholesale and late
/// notifications from the old session are discarded.
///
/// Cloning is cheap and clones share the same session.
///
/// [`connect`]: SessionController::connect
pub struct SessionController<B: Backend> {
    inner: Arc<Inner<B>>,
}

impl<B: Backend> Clone for SessionController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B: Backend> {
    backend: B,
    store: StateStore,
    identity: Mutex<SessionIdentity<B>>,
}

/// The in-flight session's identity. Rebound wholesale on each connect;
/// the generation stamps which connect a notification belongs to.
struct SessionIdentity<B: Backend> {
    generation: u64,
    conversation_name: Option<CompactString>,
    client: Option<Arc<B::Client>>,
    conversation: Option<Arc<<B::Client as Client>::Conversation>>,
}

impl<B> SessionController<B>
where
    B: Backend + 'static,
    B::Client: 'static,
    <B::Client as Client>::Conversation: 'static,
{
    /// Create a controller over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                store: StateStore::new(),
                identity: Mutex::new(SessionIdentity {
                    generation: 0,
                    conversation_name: None,
                    client: None,
                    conversation: None,
                }),
            }),
        }
    }

    /// The latest published snapshot.
    pub fn current(&self) -> SessionSnapshot {
        self.inner.store.current()
    }

    /// Subscribe to the snapshot stream, starting from the current value.
    pub fn subscribe(&self) -> impl Stream<Item = SessionSnapshot> + Send + use<B> {
        self.inner.store.subscribe()
    }

    /// Start a new session: authenticate with `token` and join the
    /// conversation named `conversation_name`.
    ///
    /// Publishes a `{Connecting, []}` snapshot before returning. Never
    /// fails synchronously; any failure surfaces later as a
    /// `{Disconnected, []}` snapshot, with detail going to the log only.
    /// There is no automatic retry and no cancellation of a prior
    /// in-flight session; calling again simply supersedes it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self, token: impl Into<String>, conversation_name: impl Into<CompactString>) {
        let token = token.into();
        let generation = {
            let mut identity = self.inner.identity.lock().unwrap();
            identity.generation += 1;
            identity.conversation_name = Some(conversation_name.into());
            identity.client = None;
            identity.conversation = None;
            identity.generation
        };
        self.inner.store.mutate(|_| SessionSnapshot {
            connection_state: ConnectionState::Connecting,
            messages: Vec::new(),
        });
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_session(generation, token).await;
        });
    }
}

impl<B> Inner<B>
where
    B: Backend + 'static,
    B::Client: 'static,
    <B::Client as Client>::Conversation: 'static,
{
    /// Create the client, then drain its notifications until the backend
    /// closes the event channel.
    async fn run_session(self: Arc<Self>, generation: u64, token: String) {
        let properties = ClientProperties::default();
        let client = match self.backend.create_client(&token, &properties).await {
            Ok(client) => Arc::new(client),
            Err(error) => return self.fail(generation, SessionError::ClientCreation(error)),
        };
        tracing::debug!("conversations client created, now synchronizing");
        if !self.bind_client(generation, Arc::clone(&client)) {
            tracing::debug!(generation, "session superseded before client was bound");
            return;
        }

        let (forwarder, mut events) = EventForwarder::channel();
        client.add_listener(Box::new(forwarder));

        while let Some(event) = events.recv().await {
            match event {
                ClientEvent::SynchronizationChanged(status) => {
                    tracing::debug!(?status, "client synchronization status");
                    match status {
                        SynchronizationStatus::Completed => {
                            self.join_conversation(generation).await;
                        }
                        SynchronizationStatus::Failed => {
                            self.fail(generation, SessionError::Synchronization);
                        }
                        _ => {}
                    }
                }
                ClientEvent::Error(error) => {
                    self.fail(generation, SessionError::ClientRuntime(error));
                }
            }
        }
    }

    /// Join the stored conversation name with the stored client, then load
    /// its history.
    async fn join_conversation(&self, generation: u64) {
        let (client, name) = {
            let identity = self.identity.lock().unwrap();
            if identity.generation != generation {
                return;
            }
            (identity.client.clone(), identity.conversation_name.clone())
        };
        // A synchronization event without a bound client and a pending
        // conversation name is spurious; skip it rather than fail.
        let (Some(client), Some(name)) = (client, name) else {
            return;
        };
        tracing::debug!(conversation = %name, "joining conversation");
        match client.conversation(&name).await {
            Ok(conversation) => {
                if !self.bind_conversation(generation, Arc::new(conversation)) {
                    return;
                }
                self.load_history(generation).await;
            }
            Err(error) => self.fail(generation, SessionError::Join(error)),
        }
    }

    /// Read the most recent messages from the joined conversation and
    /// publish the Connected snapshot.
    async fn load_history(&self, generation: u64) {
        let conversation = {
            let identity = self.identity.lock().unwrap();
            if identity.generation != generation {
                return;
            }
            identity.conversation.clone()
        };
        let Some(conversation) = conversation else {
            return;
        };
        match conversation.last_messages(MESSAGE_READ_COUNT).await {
            Ok(messages) => {
                tracing::debug!(count = messages.len(), "read conversation history");
                let messages = messages.into_iter().map(ChatMessage::from).collect();
                self.publish(generation, SessionSnapshot {
                    connection_state: ConnectionState::Connected,
                    messages,
                });
            }
            Err(error) => self.fail(generation, SessionError::HistoryFetch(error)),
        }
    }

    fn bind_client(&self, generation: u64, client: Arc<B::Client>) -> bool {
        let mut identity = self.identity.lock().unwrap();
        if identity.generation != generation {
            return false;
        }
        identity.client = Some(client);
        true
    }

    fn bind_conversation(&self, generation: u64, conversation: Arc<<B::Client as Client>::Conversation>) -> bool {
        let mut identity = self.identity.lock().unwrap();
        if identity.generation != generation {
            return false;
        }
        identity.conversation = Some(conversation);
        true
    }

    /// Log the error and publish a Disconnected snapshot. Messages are not
    /// preserved across a failure.
    fn fail(&self, generation: u64, error: SessionError) {
        tracing::error!(%error, "chat session error");
        self.publish(generation, SessionSnapshot::default());
    }

    /// Publish a snapshot unless this session has been superseded by a
    /// newer connect.
    fn publish(&self, generation: u64, snapshot: SessionSnapshot) {
        let identity = self.identity.lock().unwrap();
        if identity.generation != generation {
            tracing::debug!(generation, "discarding snapshot from superseded session");
            return;
        }
        self.store.mutate(move |_| snapshot);
    }
}
