use thiserror::Error;

use crate::domain::UserId;

/// Failures of a call to the remote user collection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned status {status}")]
    Status { status: u16 },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Remote call failed: {0}")]
    Remote(#[from] ApiError),
    #[error("User not found: {0}")]
    NotFound(UserId),
    #[error("Draft validation error: {0}")]
    Validation(String),
    #[error("Draft has no identifier to update")]
    MissingId,
    #[error("Form is not open")]
    FormClosed,
    #[error("Duplicate user identifier: {0}")]
    DuplicateId(UserId),
    #[error("Server answered for user {returned} instead of {expected}")]
    IdMismatch { expected: UserId, returned: UserId },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
