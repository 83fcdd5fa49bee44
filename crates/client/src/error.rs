//! Failure taxonomy for calls to the fleet service.

use std::fmt;

use fleet_core::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Timeout, DNS failure, refused connection.
    #[error("connection error: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Protocol { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid service url: {0}")]
    InvalidUrl(String),

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Validation(#[from] FleetError),
}

/// Coarse category of a [`ClientError`], for callers that only need to
/// know which class of failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connectivity,
    Protocol,
    Decode,
    Validation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connectivity => write!(f, "connectivity"),
            FailureKind::Protocol => write!(f, "protocol"),
            FailureKind::Decode => write!(f, "decode"),
            FailureKind::Validation => write!(f, "validation"),
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Connectivity(_) => FailureKind::Connectivity,
            ClientError::Protocol { .. } => FailureKind::Protocol,
            ClientError::Decode(_) => FailureKind::Decode,
            ClientError::InvalidUrl(_) | ClientError::Validation(_) => FailureKind::Validation,
        }
    }

    /// True when the request never reached the service.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::InvalidUrl(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Connectivity(err)
        }
    }
}
