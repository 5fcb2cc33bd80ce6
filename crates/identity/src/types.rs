use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, IdentityResult};

/// Profile fields stored alongside the account by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Name shown in the sidebar: profile name, then full name, then the
    /// local part of the email, then "User".
    pub fn display_name(&self) -> String {
        let meta = &self.user_metadata;
        meta.name
            .as_deref()
            .or(meta.full_name.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "User".to_string())
    }

    /// Up to two uppercase initials taken from the words of the profile name.
    pub fn initials(&self) -> String {
        let source = self
            .user_metadata
            .name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.display_name());
        source
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// Broadcast by a provider whenever its session changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// Result of a sign-up. `session` is absent while email confirmation is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpOutcome {
    pub user: User,
    pub session: Option<Session>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub name: String,
}

impl SignUpForm {
    pub fn validate(&self) -> IdentityResult<()> {
        if self.password != self.confirm_password {
            return Err(IdentityError::password_mismatch());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityErrorCode;

    fn user(name: Option<&str>, email: Option<&str>) -> User {
        User {
            id: "u-1".into(),
            email: email.map(str::to_string),
            user_metadata: UserMetadata {
                name: name.map(str::to_string),
                ..UserMetadata::default()
            },
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(user(Some("Jane Cooper"), None).display_name(), "Jane Cooper");
        assert_eq!(user(None, Some("floyd@yahoo.com")).display_name(), "floyd");
        assert_eq!(user(None, None).display_name(), "User");
    }

    #[test]
    fn test_initials() {
        assert_eq!(user(Some("Jane Cooper"), None).initials(), "JC");
        assert_eq!(user(Some("mary anne van dyke"), None).initials(), "MA");
        assert_eq!(user(None, Some("floyd@yahoo.com")).initials(), "F");
    }

    #[test]
    fn test_user_parses_without_metadata() {
        let parsed: User = serde_json::from_str(r#"{"id":"abc","email":null}"#).unwrap();
        assert_eq!(parsed.user_metadata, UserMetadata::default());
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn test_sign_up_form_requires_matching_passwords() {
        let form = SignUpForm {
            email: "a@b.co".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            name: "A".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.code, IdentityErrorCode::PasswordMismatch);
        assert_eq!(err.message, "Passwords do not match");

        let ok = SignUpForm {
            confirm_password: "secret1".into(),
            ..form
        };
        assert!(ok.validate().is_ok());
    }
}
