//! Errors surfaced by the remote data client.

use crate::types::EntityKind;

/// Errors from the REST API layer.
///
/// Cloneable so a failed result can travel inside an [`AppEvent`](crate::types::AppEvent)
/// back to the controller that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status code.
    #[error("Something went wrong: {status}")]
    RequestFailed { status: u16 },

    /// The body was not valid JSON or did not match the expected shape.
    #[error("Failed to parse response: {reason}")]
    DecodeFailed { reason: String },

    /// A detail view was opened without a resolvable id.
    #[error("No {kind} ID provided")]
    MissingIdentifier { kind: EntityKind },

    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("Failed to fetch data: {reason}")]
    Transport { reason: String },

    /// A reference URL whose trailing segment is not an entity id, or that
    /// names a different kind than the one requested.
    #[error("Invalid reference URL: {url}")]
    InvalidReference { url: String },
}

impl ApiError {
    /// HTTP status for `RequestFailed`, `None` otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::DecodeFailed {
            reason: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport {
            reason: e.to_string(),
        }
    }
}
