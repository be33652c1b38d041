//! Chat session lifecycle: connect, synchronize, join, load history.
//!
//! One [`SessionController`] drives a single chat session against a
//! conversations backend and publishes its progress through a
//! [`StateStore`] as a stream of immutable [`SessionSnapshot`] values.
//! The caller's whole surface is `connect` plus snapshot observation;
//! every failure along the way collapses to a Disconnected snapshot.

pub use controller::{MESSAGE_READ_COUNT, SessionController};
pub use error::SessionError;
pub use snapshot::{ChatMessage, ConnectionState, SessionSnapshot};
pub use state::StateStore;

pub mod controller;
pub mod error;
pub mod snapshot;
pub mod state;
