use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{IdentityError, IdentityResult};
use crate::types::{AuthChange, AuthEvent, Session, SignUpOutcome, UserMetadata};

const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// Operations consumed from the external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> IdentityResult<SignUpOutcome>;

    async fn reset_password_for_email(&self, email: &str) -> IdentityResult<()>;

    async fn sign_out(&self) -> IdentityResult<()>;

    /// The session currently held by the provider, if any.
    async fn get_session(&self) -> IdentityResult<Option<Session>>;

    /// Stream of session changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}

/// Current session plus the change channel shared by concrete providers.
pub(crate) struct SessionCell {
    current: RwLock<Option<Session>>,
    changes: broadcast::Sender<AuthChange>,
}

impl SessionCell {
    pub(crate) fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(None),
            changes,
        }
    }

    pub(crate) fn get(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub(crate) fn set(&self, event: AuthEvent, session: Option<Session>) {
        *self.current.write() = session.clone();
        // No subscribers is not an error.
        let receivers = self.changes.send(AuthChange { event, session }).unwrap_or(0);
        debug!(?event, receivers, "Auth change broadcast");
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }
}

/// Stand-in used when no identity service is configured. Reports no
/// session; every other call fails with `NotConfigured`.
pub struct UnconfiguredProvider {
    changes: broadcast::Sender<AuthChange>,
}

impl Default for UnconfiguredProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl UnconfiguredProvider {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(1);
        Self { changes }
    }
}

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> IdentityResult<Session> {
        Err(IdentityError::not_configured())
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _metadata: UserMetadata,
    ) -> IdentityResult<SignUpOutcome> {
        Err(IdentityError::not_configured())
    }

    async fn reset_password_for_email(&self, _email: &str) -> IdentityResult<()> {
        Err(IdentityError::not_configured())
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        Err(IdentityError::not_configured())
    }

    async fn get_session(&self) -> IdentityResult<Option<Session>> {
        Ok(None)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.changes.subscribe()
    }
}
