use serde::{Deserialize, Serialize};

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Failure category reported by the identity service. Decided from the
/// provider's machine-readable code, never from its message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityErrorCode {
    InvalidCredentials,
    UserNotFound,
    EmailNotConfirmed,
    UserAlreadyExists,
    WeakPassword,
    RateLimited,
    PasswordMismatch,
    NotConfigured,
    Transport,
    Rejected,
}

impl IdentityErrorCode {
    /// Map a provider `error_code` (or legacy `error`) value.
    pub fn from_provider(code: &str) -> Self {
        match code {
            "invalid_credentials" | "invalid_grant" => Self::InvalidCredentials,
            "user_not_found" => Self::UserNotFound,
            "email_not_confirmed" => Self::EmailNotConfirmed,
            "user_already_exists" | "email_exists" => Self::UserAlreadyExists,
            "weak_password" => Self::WeakPassword,
            "over_request_rate_limit" | "over_email_send_rate_limit" => Self::RateLimited,
            _ => Self::Rejected,
        }
    }

    /// Fallback when the provider sent no code at all.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            _ => Self::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct IdentityError {
    pub code: IdentityErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl IdentityError {
    pub fn new(code: IdentityErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn not_configured() -> Self {
        Self::new(
            IdentityErrorCode::NotConfigured,
            "Missing identity provider config",
        )
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(IdentityErrorCode::Transport, err.to_string())
    }

    pub fn password_mismatch() -> Self {
        Self::new(IdentityErrorCode::PasswordMismatch, "Passwords do not match")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_codes() {
        assert_eq!(
            IdentityErrorCode::from_provider("invalid_credentials"),
            IdentityErrorCode::InvalidCredentials
        );
        assert_eq!(
            IdentityErrorCode::from_provider("user_not_found"),
            IdentityErrorCode::UserNotFound
        );
        assert_eq!(
            IdentityErrorCode::from_provider("email_exists"),
            IdentityErrorCode::UserAlreadyExists
        );
        assert_eq!(
            IdentityErrorCode::from_provider("something_new"),
            IdentityErrorCode::Rejected
        );
        assert_eq!(IdentityErrorCode::from_status(429), IdentityErrorCode::RateLimited);
    }

    #[test]
    fn test_display_is_message() {
        let err = IdentityError::not_configured();
        assert_eq!(err.to_string(), "Missing identity provider config");
        assert_eq!(err.status, None);
        assert_eq!(IdentityError::password_mismatch().with_status(400).status, Some(400));
    }
}
