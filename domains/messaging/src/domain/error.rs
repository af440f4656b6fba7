//! Typed domain errors for the Messaging domain
//!
//! Each variant maps to exactly one response status via the common error
//! taxonomy.

use parley_common::Error;
use thiserror::Error;

/// Domain-level failures for thread and message operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessagingError {
    #[error("Cannot create a thread with yourself")]
    SelfThread,

    #[error("Participant not found")]
    ParticipantNotFound,

    #[error("Not a participant of this thread")]
    NotParticipant,

    #[error("Not authorized to access this resource")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl From<MessagingError> for Error {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::SelfThread => Error::Validation(err.to_string()),
            MessagingError::ParticipantNotFound => Error::NotFound(err.to_string()),
            MessagingError::NotParticipant | MessagingError::Forbidden => {
                Error::Authorization(err.to_string())
            }
            MessagingError::NotFound(_) => Error::NotFound(err.to_string()),
        }
    }
}
