use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::notification::Notification;

/// The two failure families a session can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    ConnectionUnavailable,
    UnexpectedPayload,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid gesture service endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme '{scheme}' (expected http, https, ws or wss)")]
    UnsupportedScheme { scheme: String },
    #[error("failed to connect to gesture service at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },
    #[error("unexpected payload from gesture service: {reason}")]
    UnexpectedPayload { reason: String },
}

impl SessionError {
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            Self::InvalidEndpoint { .. } | Self::UnsupportedScheme { .. } | Self::Connect { .. } => {
                SessionErrorKind::ConnectionUnavailable
            }
            Self::UnexpectedPayload { .. } => SessionErrorKind::UnexpectedPayload,
        }
    }

    /// Transient notification shown to the user for this failure.
    pub fn notification(&self) -> Notification {
        match self.kind() {
            SessionErrorKind::ConnectionUnavailable => {
                Notification::error("Unable to reach gesture service", Some(self.to_string()))
            }
            SessionErrorKind::UnexpectedPayload => Notification::error(
                "Ignored unexpected payload from gesture service",
                Some(self.to_string()),
            ),
        }
    }
}
