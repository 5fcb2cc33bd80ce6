//! Sign-in, sign-up, password reset and logout endpoints.
//!
//! Every response carries the toast and follow-up navigation the auth
//! screens show, whether the action succeeded or not.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use evocrm_identity::notify;
use evocrm_identity::{
    AuthFeedback, IdentityError, IdentityErrorCode, SessionProvider, SessionState, SignUpForm, User,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    /// Screen the user was redirected away from.
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// User fields the header and sidebar render.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub initials: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name(),
            initials: user.initials(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub feedback: AuthFeedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<IdentityErrorCode>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionState,
    pub user: Option<UserProfile>,
}

type AuthResult = Result<Json<AuthResponse>, (StatusCode, Json<AuthResponse>)>;

pub fn status_for(code: IdentityErrorCode) -> StatusCode {
    match code {
        IdentityErrorCode::InvalidCredentials | IdentityErrorCode::EmailNotConfirmed => {
            StatusCode::UNAUTHORIZED
        }
        IdentityErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        IdentityErrorCode::UserAlreadyExists => StatusCode::CONFLICT,
        IdentityErrorCode::WeakPassword | IdentityErrorCode::PasswordMismatch => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IdentityErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        IdentityErrorCode::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        IdentityErrorCode::Transport => StatusCode::BAD_GATEWAY,
        IdentityErrorCode::Rejected => StatusCode::BAD_REQUEST,
    }
}

fn ok(feedback: AuthFeedback, user: Option<&User>) -> Json<AuthResponse> {
    Json(AuthResponse {
        feedback,
        user: user.map(UserProfile::from),
        error: None,
    })
}

fn failed(err: &IdentityError, feedback: AuthFeedback) -> (StatusCode, Json<AuthResponse>) {
    metrics::counter!("auth.failures").increment(1);
    (
        status_for(err.code),
        Json(AuthResponse {
            feedback,
            user: None,
            error: Some(err.code),
        }),
    )
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(session): State<Arc<SessionProvider>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult {
    match session.sign_in(&req.email, &req.password).await {
        Ok(user) => {
            metrics::counter!("auth.sign_ins").increment(1);
            Ok(ok(notify::sign_in_succeeded(req.from.as_deref()), Some(&user)))
        }
        Err(err) => Err(failed(&err, notify::sign_in_failed(&err, &req.email))),
    }
}

/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(session): State<Arc<SessionProvider>>,
    Json(form): Json<SignUpForm>,
) -> AuthResult {
    if let Err(err) = form.validate() {
        return Err(failed(&err, notify::sign_up_failed(&err)));
    }
    match session.sign_up(&form.email, &form.password, &form.name).await {
        Ok(outcome) => {
            metrics::counter!("auth.sign_ups").increment(1);
            let user = outcome.session.as_ref().map(|s| &s.user);
            Ok(ok(notify::sign_up_succeeded(), user))
        }
        Err(err) => Err(failed(&err, notify::sign_up_failed(&err))),
    }
}

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(session): State<Arc<SessionProvider>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult {
    match session.forgot_password(&req.email).await {
        Ok(()) => Ok(ok(notify::reset_sent(), None)),
        Err(err) => Err(failed(&err, notify::reset_failed(&err))),
    }
}

/// POST /api/v1/auth/logout
pub async fn logout(State(session): State<Arc<SessionProvider>>) -> AuthResult {
    match session.logout().await {
        Ok(()) => Ok(ok(notify::signed_out(), None)),
        Err(err) => {
            warn!(code = ?err.code, "Logout rejected");
            let user = session.current_user();
            let (status, mut body) = failed(&err, notify::sign_out_failed());
            body.user = user.as_ref().map(UserProfile::from);
            Err((status, body))
        }
    }
}

/// GET /api/v1/auth/session
pub async fn current_session(State(session): State<Arc<SessionProvider>>) -> Json<SessionResponse> {
    let state = session.state();
    let user = state.user().map(UserProfile::from);
    Json(SessionResponse { session: state, user })
}
