//! Identity boundary for the dashboard.
//!
//! An [`IdentityProvider`] is the single network dependency: password
//! sign-in, sign-up with profile metadata, password reset by email,
//! sign-out and a stream of auth changes. [`SessionProvider`] owns the
//! signed-in state on top of a provider and is passed explicitly to
//! whoever needs it.

pub mod error;
pub mod http;
pub mod memory;
pub mod notify;
pub mod provider;
pub mod session;
pub mod types;

pub use error::{IdentityError, IdentityErrorCode, IdentityResult};
pub use http::HttpIdentityProvider;
pub use memory::InMemoryIdentityProvider;
pub use notify::{AuthFeedback, Notification, NotificationLevel, Redirect};
pub use provider::{IdentityProvider, UnconfiguredProvider};
pub use session::{SessionProvider, SessionState};
pub use types::{AuthChange, AuthEvent, Session, SignUpForm, SignUpOutcome, User, UserMetadata};
