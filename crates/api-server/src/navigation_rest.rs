//! Sidebar contents for the signed-in user.

use axum::extract::{Query, State};
use axum::Json;
use evocrm_core::navigation::{sidebar, MenuItem};
use evocrm_core::Screen;
use evocrm_identity::SessionProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth_rest::UserProfile;

#[derive(Debug, Default, Deserialize)]
pub struct NavigationQuery {
    /// Client path currently shown.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub items: Vec<MenuItem>,
    pub screen: Screen,
    /// Menu entry to highlight for `screen`, if any.
    pub active: Option<&'static str>,
    pub user: Option<UserProfile>,
}

/// Menu id highlighted for a screen. The customer profile keeps
/// "Customers" highlighted.
pub fn active_item(screen: &Screen) -> Option<&'static str> {
    match screen {
        Screen::Dashboard => Some("dashboard"),
        Screen::Products => Some("product"),
        Screen::Customers | Screen::CustomerDetail(_) => Some("customers"),
        Screen::Income => Some("income"),
        Screen::Promote => Some("promote"),
        Screen::Login | Screen::Register | Screen::NotFound => None,
    }
}

/// GET /api/v1/navigation
pub async fn navigation(
    State(session): State<Arc<SessionProvider>>,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let screen = Screen::resolve(query.path.as_deref().unwrap_or("/"));
    Json(NavigationResponse {
        items: sidebar(),
        active: active_item(&screen),
        screen,
        user: session.current_user().as_ref().map(UserProfile::from),
    })
}
