//! Presenter error model.

use thiserror::Error;

use webpos_core::{DomainError, SubmissionId};

/// The server link failed before any reply body was available.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("transport failed with status {status}")]
pub struct TransportError {
    /// Opaque status code reported by the transport (HTTP status, 0 if none).
    pub status: u16,
}

/// The bill printer could not produce the bill.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("printing failed: {0}")]
pub struct PrintError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresenterError {
    /// The model refused a command (unknown product, bad quantity, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Print(#[from] PrintError),

    /// A reply arrived for a submission that is not outstanding.
    #[error("unexpected reply for submission {0}")]
    UnexpectedReply(SubmissionId),
}
