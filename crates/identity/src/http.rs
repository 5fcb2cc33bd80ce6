//! Client for a hosted auth REST API (`/auth/v1/*`).

use std::time::Duration;

use async_trait::async_trait;
use evocrm_core::config::IdentityConfig;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::{IdentityError, IdentityErrorCode, IdentityResult};
use crate::provider::{IdentityProvider, SessionCell};
use crate::types::{AuthChange, AuthEvent, Session, SignUpOutcome, User, UserMetadata};

/// Error body shapes returned by the service, current and legacy.
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderErrorBody {
    fn into_error(self, status: u16) -> IdentityError {
        let code = self
            .error_code
            .as_deref()
            .or(self.error.as_deref())
            .map(IdentityErrorCode::from_provider)
            .unwrap_or_else(|| IdentityErrorCode::from_status(status));
        let message = self
            .msg
            .or(self.message)
            .or(self.error_description)
            .unwrap_or_default();
        IdentityError::new(code, message).with_status(status)
    }
}

/// Sign-up answers with a session when confirmation is disabled, otherwise
/// with the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(Session),
    User(User),
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    reset_redirect: Option<String>,
    cell: SessionCell,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> IdentityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IdentityError::transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            reset_redirect: None,
            cell: SessionCell::new(),
        })
    }

    /// Build from config; fails with `NotConfigured` when url or key is missing.
    pub fn from_config(config: &IdentityConfig) -> IdentityResult<Self> {
        let (url, key) = config
            .credentials()
            .ok_or_else(IdentityError::not_configured)?;
        let mut provider = Self::new(url, key, Duration::from_millis(config.timeout_ms))?;
        provider.reset_redirect = config.password_reset_redirect.clone();
        info!(url = %provider.base_url, timeout_ms = config.timeout_ms, "Identity provider configured");
        Ok(provider)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> IdentityResult<reqwest::Response> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(IdentityError::transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ProviderErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let err = parsed.into_error(status.as_u16());
        warn!(status = status.as_u16(), code = ?err.code, "Identity request rejected");
        Err(err)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let request = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let session: Session = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(IdentityError::transport)?;
        self.cell.set(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> IdentityResult<SignUpOutcome> {
        let request = self.client.post(self.endpoint("signup")).json(&json!({
            "email": email,
            "password": password,
            "data": metadata,
        }));
        let body: SignUpBody = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(IdentityError::transport)?;

        Ok(match body {
            SignUpBody::Session(session) => {
                self.cell.set(AuthEvent::SignedIn, Some(session.clone()));
                SignUpOutcome {
                    user: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpBody::User(user) => SignUpOutcome {
                user,
                session: None,
            },
        })
    }

    async fn reset_password_for_email(&self, email: &str) -> IdentityResult<()> {
        let mut request = self
            .client
            .post(self.endpoint("recover"))
            .json(&json!({ "email": email }));
        if let Some(redirect) = &self.reset_redirect {
            request = request.query(&[("redirect_to", redirect.as_str())]);
        }
        self.send(request).await?;
        Ok(())
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if let Some(session) = self.cell.get() {
            let request = self
                .client
                .post(self.endpoint("logout"))
                .bearer_auth(&session.access_token);
            match self.send(request).await {
                Ok(_) => {}
                // The service no longer knows this session; drop it locally.
                Err(err) if matches!(err.status, Some(401 | 403 | 404)) => {
                    warn!(status = ?err.status, "Logout rejected, clearing local session");
                }
                Err(err) => return Err(err),
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::collections::HashMap;

    const KEY: &str = "anon-test-key";

    fn session_json(email: &str) -> Value {
        json!({
            "access_token": "token-abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "refresh_token": "refresh-abc",
            "user": { "id": "user-1", "email": email, "user_metadata": { "name": "Jane Cooper" } }
        })
    }

    async fn token(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(KEY) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key found in request" })));
        }
        if params.get("grant_type").map(String::as_str) != Some("password") {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unsupported_grant_type" })));
        }
        match (body["email"].as_str(), body["password"].as_str()) {
            (Some("jane@microsoft.com"), Some("correct")) => {
                (StatusCode::OK, Json(session_json("jane@microsoft.com")))
            }
            (Some("jane@microsoft.com"), _) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "code": 400, "error_code": "invalid_credentials", "msg": "Invalid login credentials" })),
            ),
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "code": 400, "error_code": "user_not_found", "msg": "User not found" })),
            ),
        }
    }

    async fn signup(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "id": "user-2",
            "email": body["email"],
            "user_metadata": body["data"],
        }))
    }

    async fn logout(headers: HeaderMap) -> StatusCode {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer token-abc") => StatusCode::NO_CONTENT,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    async fn recover() -> (StatusCode, Json<Value>) {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "msg": "For security purposes, you can only request this once every 60 seconds" })),
        )
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/logout", post(logout))
            .route("/auth/v1/recover", post(recover));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    async fn provider() -> HttpIdentityProvider {
        let url = spawn_stub().await;
        HttpIdentityProvider::new(&url, KEY, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let err = HttpIdentityProvider::from_config(&IdentityConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.code, IdentityErrorCode::NotConfigured);
    }

    #[test]
    fn test_error_body_prefers_error_code() {
        let body: ProviderErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        let err = body.into_error(400);
        assert_eq!(err.code, IdentityErrorCode::InvalidCredentials);
        assert_eq!(err.message, "Invalid login credentials");
        assert_eq!(err.status, Some(400));

        let empty = ProviderErrorBody::default().into_error(500);
        assert_eq!(empty.code, IdentityErrorCode::Rejected);
        assert!(empty.message.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_and_out_round_trip() {
        let provider = provider().await;
        let mut changes = provider.subscribe();

        let session = provider
            .sign_in_with_password("jane@microsoft.com", "correct")
            .await
            .unwrap();
        assert_eq!(session.user.display_name(), "Jane Cooper");
        assert_eq!(session.expires_at, Some(1_700_000_000));
        assert_eq!(provider.get_session().await.unwrap(), Some(session));
        assert_eq!(changes.recv().await.unwrap().event, AuthEvent::SignedIn);

        provider.sign_out().await.unwrap();
        assert_eq!(provider.get_session().await.unwrap(), None);
        assert_eq!(changes.recv().await.unwrap().event, AuthEvent::SignedOut);
    }

    async fn spawn_logout_stub(logout_status: StatusCode) -> String {
        let app = Router::new()
            .route(
                "/auth/v1/token",
                post(|| async { Json(session_json("jane@microsoft.com")) }),
            )
            .route(
                "/auth/v1/logout",
                post(move || async move {
                    (logout_status, Json(json!({ "error_code": "session_not_found", "msg": "Session not found" })))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_sign_out_clears_expired_session() {
        let url = spawn_logout_stub(StatusCode::UNAUTHORIZED).await;
        let provider = HttpIdentityProvider::new(&url, KEY, Duration::from_secs(5)).unwrap();
        provider
            .sign_in_with_password("jane@microsoft.com", "correct")
            .await
            .unwrap();
        let mut changes = provider.subscribe();

        provider.sign_out().await.unwrap();
        assert_eq!(provider.get_session().await.unwrap(), None);
        assert_eq!(changes.recv().await.unwrap().event, AuthEvent::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_out_server_error_keeps_session() {
        let url = spawn_logout_stub(StatusCode::INTERNAL_SERVER_ERROR).await;
        let provider = HttpIdentityProvider::new(&url, KEY, Duration::from_secs(5)).unwrap();
        provider
            .sign_in_with_password("jane@microsoft.com", "correct")
            .await
            .unwrap();

        let err = provider.sign_out().await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert!(provider.get_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_errors_carry_typed_codes() {
        let provider = provider().await;

        let wrong = provider
            .sign_in_with_password("jane@microsoft.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(wrong.code, IdentityErrorCode::InvalidCredentials);
        assert_eq!(wrong.message, "Invalid login credentials");

        let unknown = provider
            .sign_in_with_password("ghost@example.com", "x")
            .await
            .unwrap_err();
        assert_eq!(unknown.code, IdentityErrorCode::UserNotFound);
        assert_eq!(provider.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_up_pending_confirmation() {
        let provider = provider().await;
        let outcome = provider
            .sign_up(
                "new@example.com",
                "secret1",
                UserMetadata {
                    name: Some("New Person".into()),
                    ..UserMetadata::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.session.is_none());
        assert_eq!(outcome.user.email.as_deref(), Some("new@example.com"));
        assert_eq!(outcome.user.user_metadata.name.as_deref(), Some("New Person"));
    }

    #[tokio::test]
    async fn test_rate_limited_without_code() {
        let provider = provider().await;
        let err = provider
            .reset_password_for_email("jane@microsoft.com")
            .await
            .unwrap_err();
        assert_eq!(err.code, IdentityErrorCode::RateLimited);
        assert_eq!(err.status, Some(429));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            HttpIdentityProvider::new(&format!("http://{addr}"), KEY, Duration::from_secs(2)).unwrap();
        let err = provider
            .sign_in_with_password("jane@microsoft.com", "correct")
            .await
            .unwrap_err();
        assert_eq!(err.code, IdentityErrorCode::Transport);
    }
}
