//! Bearer credentials: where tokens come from and how a session turns into
//! an `Authorization` header.
//!
//! The identity provider itself is out of scope. The host signs the user in
//! however it likes and hands the client a [`CredentialSource`] that can
//! produce a fresh ID token on demand; refresh and expiry are the source's
//! business.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::error::ClientError;
use crate::session::{Identity, GUEST_TOKEN};

/// Failure reported by a [`CredentialSource`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The session can no longer be refreshed; the user must sign in again.
    #[error("session expired")]
    Expired,

    /// The identity provider could not be reached or refused the refresh.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Something that can produce a short-lived bearer token for a signed-in user.
#[async_trait]
pub trait CredentialSource: Send + Sync + 'static {
    /// Return a currently valid ID token, refreshing it first if necessary.
    async fn id_token(&self) -> Result<String, CredentialError>;
}

/// A fixed token, e.g. one pasted on the command line or minted by a test.
#[derive(Clone)]
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CredentialSource for StaticCredential {
    async fn id_token(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}

/// Adapts an async closure into a [`CredentialSource`].
///
/// ```rust,ignore
/// let source = FnCredential::new(move || {
///     let pool = pool.clone();
///     async move { pool.current_session().await.map(|s| s.id_token) }
/// });
/// ```
pub struct FnCredential<F> {
    f: F,
}

impl<F> FnCredential<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> CredentialSource for FnCredential<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, CredentialError>> + Send + 'static,
{
    async fn id_token(&self) -> Result<String, CredentialError> {
        (self.f)().await
    }
}

/// Turn a session snapshot into the value of the `Authorization` header.
///
/// Guest sessions resolve to `Bearer Anonymous` without touching any
/// credential source. Fails with [`ClientError::NoSession`] when no identity
/// is set and [`ClientError::CredentialRefresh`] when the source errors.
pub async fn resolve_authorization(identity: &Identity) -> Result<String, ClientError> {
    match identity {
        Identity::None => Err(ClientError::NoSession),
        Identity::Guest => Ok(format!("Bearer {GUEST_TOKEN}")),
        Identity::Authenticated(source) => match source.id_token().await {
            Ok(token) => Ok(format!("Bearer {token}")),
            Err(e) => {
                warn!("credential refresh failed: {e}");
                Err(ClientError::CredentialRefresh(e))
            }
        },
    }
}
