//! Signed-in state shared by every screen.
//!
//! `SessionProvider` wraps an [`IdentityProvider`] and tracks:
//!
//! ```text
//! Anonymous ──sign_in──▶ Authenticating ──ok──▶ Authenticated
//!     ▲                        │                     │
//!     └──────── err ───────────┘                  logout
//!     ▲                                              ▼
//!     └────────────────── ok ─────────────────── LoggingOut
//! ```
//!
//! `init` restores any session the provider already holds and starts a
//! listener for provider-side changes; `teardown` stops it.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{IdentityError, IdentityResult};
use crate::provider::IdentityProvider;
use crate::types::{AuthChange, AuthEvent, SignUpOutcome, User, UserMetadata};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Anonymous { last_error: Option<IdentityError> },
    Authenticating,
    Authenticated { user: User },
    LoggingOut { user: User },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Anonymous { last_error: None }
    }
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user } | SessionState::LoggingOut { user } => Some(user),
            _ => None,
        }
    }
}

pub struct SessionProvider {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<RwLock<SessionState>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

fn apply_change(state: &RwLock<SessionState>, change: AuthChange) {
    let mut current = state.write();
    match (change.event, change.session) {
        (AuthEvent::SignedOut, _) | (_, None) => {
            if current.user().is_some() {
                *current = SessionState::default();
            }
        }
        (_, Some(session)) => {
            *current = SessionState::Authenticated { user: session.user };
        }
    }
}

impl SessionProvider {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(RwLock::new(SessionState::default())),
            listener: Mutex::new(None),
        }
    }

    /// Restore the provider's session with a single check and subscribe to
    /// its changes. Calling again replaces the previous listener.
    pub async fn init(&self) {
        let mut changes = self.provider.subscribe();

        let restored = match self.provider.get_session().await {
            Ok(Some(session)) => {
                info!(user_id = %session.user.id, "Session restored");
                SessionState::Authenticated { user: session.user }
            }
            Ok(None) => SessionState::default(),
            Err(err) => {
                warn!(error = %err, "Session check failed");
                SessionState::Anonymous {
                    last_error: Some(err),
                }
            }
        };
        *self.state.write() = restored;

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => apply_change(&state, change),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Auth change listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        if let Some(previous) = self.listener.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Stop listening for provider changes.
    pub fn teardown(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
            info!("Session listener stopped");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), SessionState::Authenticated { .. })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<User> {
        *self.state.write() = SessionState::Authenticating;

        match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                let user = session.user;
                info!(user_id = %user.id, "Signed in");
                *self.state.write() = SessionState::Authenticated { user: user.clone() };
                Ok(user)
            }
            Err(err) => {
                warn!(code = ?err.code, "Sign-in failed");
                // A failed attempt does not end a session the provider still holds.
                let held = self.provider.get_session().await.ok().flatten();
                *self.state.write() = match held {
                    Some(session) => SessionState::Authenticated { user: session.user },
                    None => SessionState::Anonymous {
                        last_error: Some(err.clone()),
                    },
                };
                Err(err)
            }
        }
    }

    /// Create an account with `name` stored as profile metadata. The state
    /// only changes when the provider hands back a session straight away.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> IdentityResult<SignUpOutcome> {
        let metadata = UserMetadata {
            name: Some(name.to_string()).filter(|n| !n.trim().is_empty()),
            ..UserMetadata::default()
        };
        let outcome = self.provider.sign_up(email, password, metadata).await?;
        info!(user_id = %outcome.user.id, confirmed = outcome.session.is_some(), "Account created");
        if let Some(session) = &outcome.session {
            *self.state.write() = SessionState::Authenticated {
                user: session.user.clone(),
            };
        }
        Ok(outcome)
    }

    pub async fn forgot_password(&self, email: &str) -> IdentityResult<()> {
        self.provider.reset_password_for_email(email).await
    }

    /// Sign out. On failure a signed-in user stays signed in.
    pub async fn logout(&self) -> IdentityResult<()> {
        let previous = {
            let mut state = self.state.write();
            let user = state.user().cloned();
            if let Some(user) = &user {
                *state = SessionState::LoggingOut { user: user.clone() };
            }
            user
        };

        match self.provider.sign_out().await {
            Ok(()) => {
                *self.state.write() = SessionState::default();
                info!("Signed out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Sign-out failed");
                if let Some(user) = previous {
                    *self.state.write() = SessionState::Authenticated { user };
                }
                Err(err)
            }
        }
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}
