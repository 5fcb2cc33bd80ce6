//! Toast messages and follow-up navigation for the auth screens.

use evocrm_core::navigation::{Screen, DEFAULT_LANDING};
use serde::Serialize;

use crate::error::{IdentityError, IdentityErrorCode};

/// Delay before an unregistered email is sent on to the register screen.
pub const REGISTER_REDIRECT_DELAY_MS: u64 = 2000;

pub const SIGNED_IN: &str = "Successfully logged in!";
pub const SIGN_IN_FAILED: &str = "Login failed. Please try again.";
pub const EMAIL_NOT_REGISTERED: &str = "This email is not registered. Please register first.";
pub const ACCOUNT_CREATED: &str = "Account created! Please check your email for confirmation.";
pub const SIGN_UP_FAILED: &str = "Signup failed. Please try again.";
pub const RESET_SENT: &str = "Password reset link sent to your email!";
pub const RESET_FAILED: &str = "Failed to send password reset email";
pub const SIGNED_OUT: &str = "Successfully logged out";
pub const SIGN_OUT_FAILED: &str = "Error logging out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub delay_ms: u64,
}

impl Redirect {
    pub fn now(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            email: None,
            delay_ms: 0,
        }
    }
}

/// What the client shows and where it goes after an auth action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthFeedback {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

impl AuthFeedback {
    fn toast(notification: Notification) -> Self {
        Self {
            notification,
            redirect: None,
        }
    }
}

fn message_or(err: &IdentityError, fallback: &str) -> String {
    if err.message.trim().is_empty() {
        fallback.to_string()
    } else {
        err.message.clone()
    }
}

/// Go back to the screen the user was sent away from, if it is one that
/// needs a session; otherwise land on the dashboard.
pub fn sign_in_succeeded(from: Option<&str>) -> AuthFeedback {
    let target = from
        .filter(|path| Screen::resolve(path).requires_session())
        .unwrap_or(DEFAULT_LANDING);
    AuthFeedback {
        notification: Notification::success(SIGNED_IN),
        redirect: Some(Redirect::now(target)),
    }
}

pub fn sign_in_failed(err: &IdentityError, email: &str) -> AuthFeedback {
    if err.code == IdentityErrorCode::UserNotFound {
        return AuthFeedback {
            notification: Notification::error(EMAIL_NOT_REGISTERED),
            redirect: Some(Redirect {
                path: Screen::Register.path(),
                email: Some(email.to_string()),
                delay_ms: REGISTER_REDIRECT_DELAY_MS,
            }),
        };
    }

    let fallback = match err.status {
        Some(400) => "Invalid email or password.",
        Some(401) => "Invalid credentials.",
        _ => SIGN_IN_FAILED,
    };
    AuthFeedback::toast(Notification::error(message_or(err, fallback)))
}

pub fn sign_up_succeeded() -> AuthFeedback {
    AuthFeedback::toast(Notification::success(ACCOUNT_CREATED))
}

pub fn sign_up_failed(err: &IdentityError) -> AuthFeedback {
    AuthFeedback::toast(Notification::error(message_or(err, SIGN_UP_FAILED)))
}

pub fn reset_sent() -> AuthFeedback {
    AuthFeedback::toast(Notification::success(RESET_SENT))
}

pub fn reset_failed(err: &IdentityError) -> AuthFeedback {
    AuthFeedback::toast(Notification::error(message_or(err, RESET_FAILED)))
}

pub fn signed_out() -> AuthFeedback {
    AuthFeedback {
        notification: Notification::success(SIGNED_OUT),
        redirect: Some(Redirect::now(Screen::Login.path())),
    }
}

pub fn sign_out_failed() -> AuthFeedback {
    AuthFeedback::toast(Notification::error(SIGN_OUT_FAILED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_account_redirects_to_register() {
        let err = IdentityError::new(IdentityErrorCode::UserNotFound, "User not found");
        let feedback = sign_in_failed(&err, "ghost@example.com");
        assert_eq!(feedback.notification, Notification::error(EMAIL_NOT_REGISTERED));
        assert_eq!(
            feedback.redirect,
            Some(Redirect {
                path: "/register".into(),
                email: Some("ghost@example.com".into()),
                delay_ms: 2000,
            })
        );
    }

    #[test]
    fn test_wrong_password_shows_provider_message() {
        let err = IdentityError::new(IdentityErrorCode::InvalidCredentials, "Invalid login credentials")
            .with_status(400);
        let feedback = sign_in_failed(&err, "jane@microsoft.com");
        assert_eq!(feedback.notification.message, "Invalid login credentials");
        assert!(feedback.redirect.is_none());
    }

    #[test]
    fn test_sign_in_fallback_messages() {
        let bare = |status| IdentityError::new(IdentityErrorCode::Rejected, "").with_status(status);
        assert_eq!(
            sign_in_failed(&bare(401), "a@b.co").notification.message,
            "Invalid credentials."
        );
        assert_eq!(
            sign_in_failed(&bare(400), "a@b.co").notification.message,
            "Invalid email or password."
        );
        assert_eq!(
            sign_in_failed(&bare(503), "a@b.co").notification.message,
            SIGN_IN_FAILED
        );
    }

    #[test]
    fn test_sign_in_landing() {
        let land = |from| sign_in_succeeded(from).redirect.unwrap().path;
        assert_eq!(land(None), "/dashboard");
        assert_eq!(land(Some("/customers/4")), "/customers/4");
        assert_eq!(land(Some("/login")), "/dashboard");
        assert_eq!(land(Some("/nowhere")), "/dashboard");
    }

    #[test]
    fn test_other_messages() {
        assert_eq!(sign_up_succeeded().notification.message, ACCOUNT_CREATED);
        let empty = IdentityError::new(IdentityErrorCode::Transport, "");
        assert_eq!(sign_up_failed(&empty).notification.message, SIGN_UP_FAILED);
        assert_eq!(reset_failed(&empty).notification.message, RESET_FAILED);
        assert_eq!(
            reset_failed(&IdentityError::not_configured()).notification.message,
            "Missing identity provider config"
        );
        assert_eq!(signed_out().redirect.unwrap().path, "/login");
        assert_eq!(sign_out_failed().notification.level, NotificationLevel::Error);
    }
}
