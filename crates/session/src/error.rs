//! Session failure taxonomy.
//!
//! Every variant is backend-reported and handled identically: logged
//! once, then mapped to a Disconnected snapshot. Observers never see the
//! error itself, only the resulting state.

use backend::ErrorInfo;
use thiserror::Error;

/// A failure at some stage of the connect/join/load sequence, or a
/// client-level error after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The backend rejected client creation.
    #[error("error creating conversations client: {0}")]
    ClientCreation(ErrorInfo),
    /// Client synchronization failed. Reported as a status, so there is
    /// no error detail to carry.
    #[error("client synchronization failed")]
    Synchronization,
    /// The conversation could not be joined.
    #[error("error joining conversation: {0}")]
    Join(ErrorInfo),
    /// The initial history read failed.
    #[error("error retrieving conversation history: {0}")]
    HistoryFetch(ErrorInfo),
    /// A client-level error arrived outside the connect sequence.
    #[error("client error: {0}")]
    ClientRuntime(ErrorInfo),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_backend_detail() {
        let err = SessionError::Join(ErrorInfo::new(50350, "not a participant"));
        assert_eq!(
            err.to_string(),
            "error joining conversation: [50350] not a participant"
        );
    }
}
