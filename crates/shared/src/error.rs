use thiserror::Error;

use crate::domain::{MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};

/// Shown when the service gave no usable `detail`.
pub const DEFAULT_FAILURE_MESSAGE: &str = "The search could not be completed.";

/// Rejections raised before a request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Missing, non-numeric or negative input.
    #[error(
        "Session minutes must be a number between {} and {}.",
        MIN_SESSION_MINUTES,
        MAX_SESSION_MINUTES
    )]
    InvalidSessionMinutes,
    #[error("Session minutes must be between {min} and {max} (got {minutes}).")]
    SessionMinutesOutOfRange { minutes: u32, min: u32, max: u32 },
}

/// Why a single routine, section or exercise record could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("exercise item has no name")]
    MissingName,
    #[error("malformed {kind} record: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

impl RecordError {
    pub fn malformed(kind: &'static str, err: serde_json::Error) -> Self {
        Self::Malformed {
            kind,
            reason: err.to_string(),
        }
    }
}
