//! Local account table standing in for the hosted service.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityErrorCode, IdentityResult};
use crate::provider::{IdentityProvider, SessionCell};
use crate::types::{AuthChange, AuthEvent, Session, SignUpOutcome, User, UserMetadata};

const MIN_PASSWORD_LEN: usize = 6;
const SESSION_TTL_SECS: i64 = 3600;

struct Account {
    user: User,
    password_hash: String,
    confirmed: bool,
}

pub struct InMemoryIdentityProvider {
    accounts: DashMap<String, Account>,
    auto_confirm: bool,
    reset_requests: Mutex<Vec<String>>,
    cell: SessionCell,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(user_id: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn random_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl InMemoryIdentityProvider {
    /// New accounts need email confirmation before they can sign in.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            auto_confirm: false,
            reset_requests: Mutex::new(Vec::new()),
            cell: SessionCell::new(),
        }
    }

    /// Sign-ups are confirmed immediately and return a session.
    pub fn auto_confirm(mut self, enabled: bool) -> Self {
        self.auto_confirm = enabled;
        self
    }

    /// Register a confirmed account.
    pub fn with_account(self, email: &str, password: &str, name: &str) -> Self {
        let user = self.insert_account(
            email,
            password,
            UserMetadata {
                name: Some(name.to_string()),
                ..UserMetadata::default()
            },
            true,
        );
        info!(user_id = %user.id, "Seeded local identity account");
        self
    }

    /// Mark a pending account as confirmed. Returns false for unknown emails.
    pub fn confirm_email(&self, email: &str) -> bool {
        match self.accounts.get_mut(&email_key(email)) {
            Some(mut account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Emails a password reset was requested for, oldest first.
    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.lock().clone()
    }

    fn insert_account(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
        confirmed: bool,
    ) -> User {
        let id = Uuid::new_v4().to_string();
        let user = User {
            id: id.clone(),
            email: Some(email.trim().to_string()),
            user_metadata: metadata,
        };
        self.accounts.insert(
            email_key(email),
            Account {
                user: user.clone(),
                password_hash: hash_password(&id, password),
                confirmed,
            },
        );
        user
    }

    fn issue_session(&self, user: User) -> Session {
        let session = Session {
            access_token: random_token(),
            refresh_token: Some(random_token()),
            expires_at: Some(Utc::now().timestamp() + SESSION_TTL_SECS),
            user,
        };
        self.cell.set(AuthEvent::SignedIn, Some(session.clone()));
        session
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let user = {
            let account = self.accounts.get(&email_key(email)).ok_or_else(|| {
                IdentityError::new(IdentityErrorCode::UserNotFound, "No account found for this email")
                    .with_status(400)
            })?;
            if account.password_hash != hash_password(&account.user.id, password) {
                return Err(IdentityError::new(
                    IdentityErrorCode::InvalidCredentials,
                    "Invalid login credentials",
                )
                .with_status(400));
            }
            if !account.confirmed {
                return Err(
                    IdentityError::new(IdentityErrorCode::EmailNotConfirmed, "Email not confirmed")
                        .with_status(400),
                );
            }
            account.user.clone()
        };
        Ok(self.issue_session(user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> IdentityResult<SignUpOutcome> {
        if self.accounts.contains_key(&email_key(email)) {
            return Err(
                IdentityError::new(IdentityErrorCode::UserAlreadyExists, "User already registered")
                    .with_status(422),
            );
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::new(
                IdentityErrorCode::WeakPassword,
                format!("Password should be at least {MIN_PASSWORD_LEN} characters."),
            )
            .with_status(422));
        }

        let user = self.insert_account(email, password, metadata, self.auto_confirm);
        let session = self.auto_confirm.then(|| self.issue_session(user.clone()));
        Ok(SignUpOutcome { user, session })
    }

    async fn reset_password_for_email(&self, email: &str) -> IdentityResult<()> {
        // Unknown addresses succeed as well.
        self.reset_requests.lock().push(email.trim().to_string());
        Ok(())
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.cell.set(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> IdentityResult<Option<Session>> {
        Ok(self.cell.get())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.cell.subscribe()
    }
}
