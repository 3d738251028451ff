use reqwest::StatusCode;
use thiserror::Error;

use georesolve_shared::ValidationError;
use georesolve_store::StoreError;

/// Coarse failure classes. Every one of them leaves the client interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad credentials, expired or missing token, or a role the backend refuses.
    AuthFailure,
    /// Caught locally before any request was made.
    ValidationFailure,
    /// Request rejected or backend unreachable.
    NetworkFailure,
    /// A device capability (geolocation) is unavailable; non-fatal.
    PartialCapabilityFailure,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Authentication failed: {}", .detail.as_deref().unwrap_or("unauthorized"))]
    Auth {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Backend returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    Url(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated | Self::Auth { .. } => ErrorKind::AuthFailure,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Api { .. }
            | Self::Network(_)
            | Self::Decode(_)
            | Self::Url(_)
            | Self::Store(_) => ErrorKind::NetworkFailure,
        }
    }

    /// Backend-supplied `detail`, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Auth { detail, .. } | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text for a user-facing notice: the backend's `detail` verbatim when
    /// present, local validation messages as written, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            other => other
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
