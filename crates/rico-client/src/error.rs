use thiserror::Error;

/// Failures surfaced by the client controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally, before any network call.
    #[error("{0}")]
    Validation(String),

    /// The request could not be sent, the response could not be read or parsed, or the
    /// endpoint answered with a non-success status.
    #[error("{0}")]
    Transport(String),

    /// Success status, but the body carries an `error` field or no `imageUrl`.
    #[error("{0}")]
    Application(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
