//! Session holder: which identity the client is currently acting as.
//!
//! The session lives inside the client instance (and is shared by its
//! clones), so several clients with different users can coexist in one
//! process. Writes are rare and caller-driven; every dispatch takes a
//! snapshot under a short read lock and works from that.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::credential::CredentialSource;

/// Token sent in place of a user token while in guest mode.
pub const GUEST_TOKEN: &str = "Anonymous";

/// The identity a request is made on behalf of. The variants are mutually
/// exclusive.
#[derive(Clone, Default)]
pub enum Identity {
    /// Nobody is signed in; every dispatch fails with `NoSession`.
    #[default]
    None,

    /// A signed-in user whose tokens come from the given source.
    Authenticated(Arc<dyn CredentialSource>),

    /// Read-only anonymous access using [`GUEST_TOKEN`].
    Guest,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::None => f.write_str("None"),
            Identity::Authenticated(_) => f.write_str("Authenticated(..)"),
            Identity::Guest => f.write_str("Guest"),
        }
    }
}

/// Shared, interior-mutable holder for the current [`Identity`].
#[derive(Clone, Default)]
pub struct SessionHolder {
    state: Arc<RwLock<Identity>>,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Act as a signed-in user from now on. Replaces guest mode.
    pub fn set_identity(&self, source: Arc<dyn CredentialSource>) {
        self.replace(Identity::Authenticated(source));
    }

    /// Forget whatever identity is set.
    pub fn clear_identity(&self) {
        self.replace(Identity::None);
    }

    /// `true` switches to guest mode, replacing any signed-in user.
    /// `false` leaves guest mode; a signed-in user is left untouched.
    pub fn set_guest_mode(&self, guest: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if guest {
            *state = Identity::Guest;
        } else if matches!(*state, Identity::Guest) {
            *state = Identity::None;
        }
    }

    /// `true` only while a named user (not a guest) is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.snapshot(), Identity::Authenticated(_))
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.snapshot(), Identity::Guest)
    }

    /// `true` when either a user or a guest identity is set.
    pub fn has_identity(&self) -> bool {
        !matches!(self.snapshot(), Identity::None)
    }

    /// A consistent copy of the current identity.
    pub fn snapshot(&self) -> Identity {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, identity: Identity) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = identity;
    }
}

impl fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionHolder").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticCredential;

    fn user() -> Arc<dyn CredentialSource> {
        Arc::new(StaticCredential::new("jwt"))
    }

    #[test]
    fn starts_empty() {
        let session = SessionHolder::new();
        assert!(!session.has_identity());
        assert!(!session.is_authenticated());
        assert!(!session.is_guest());
    }

    #[test]
    fn guest_replaces_user() {
        let session = SessionHolder::new();
        session.set_identity(user());
        assert!(session.is_authenticated());

        session.set_guest_mode(true);
        assert!(session.is_guest());
        assert!(!session.is_authenticated());
        assert!(session.has_identity());
    }

    #[test]
    fn leaving_guest_mode_clears_guest_only() {
        let session = SessionHolder::new();
        session.set_guest_mode(true);
        session.set_guest_mode(false);
        assert!(!session.has_identity());

        session.set_identity(user());
        session.set_guest_mode(false);
        assert!(session.is_authenticated());
    }

    #[test]
    fn clones_share_state() {
        let a = SessionHolder::new();
        let b = a.clone();
        a.set_identity(user());
        assert!(b.is_authenticated());
        b.clear_identity();
        assert!(!a.has_identity());
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let session = SessionHolder::new();
        session.set_guest_mode(true);
        let snap = session.snapshot();
        session.clear_identity();
        assert!(matches!(snap, Identity::Guest));
    }
}
