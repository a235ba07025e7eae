//! Error type returned by every client operation.

use thiserror::Error;

use crate::config::ConfigError;
use crate::credential::CredentialError;

/// Everything that can go wrong between calling an endpoint method and
/// holding its decoded result. Nothing is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No identity (user or guest) is set; nothing was sent.
    #[error("no session: set an identity or enable guest mode first")]
    NoSession,

    /// The credential source failed to produce a token; nothing was sent.
    #[error("credential refresh failed: {0}")]
    CredentialRefresh(#[source] CredentialError),

    /// Grant type outside `Admin`/`Read`/`Write`; nothing was sent.
    #[error("invalid grant type {0:?}")]
    InvalidGrant(String),

    /// The API answered with a non-2xx status. `message` is the raw body text.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure: DNS, connection, timeout, or reading the body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status for [`ClientError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the failure happened before any request left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::NoSession
                | ClientError::CredentialRefresh(_)
                | ClientError::InvalidGrant(_)
                | ClientError::Config(_)
        )
    }
}
