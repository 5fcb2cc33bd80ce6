//! Dashboard screens and the sidebar menu.

use serde::Serialize;

/// Screen reached after a successful sign-in when no other target was requested.
pub const DEFAULT_LANDING: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "id", rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Products,
    Customers,
    CustomerDetail(String),
    Income,
    Promote,
    Login,
    Register,
    NotFound,
}

impl Screen {
    /// Resolve a client path to its screen. Unknown paths map to `NotFound`.
    pub fn resolve(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["dashboard"] => Screen::Dashboard,
            ["products"] => Screen::Products,
            ["customers"] => Screen::Customers,
            ["customers", id] => Screen::CustomerDetail((*id).to_string()),
            ["income"] => Screen::Income,
            ["promote"] => Screen::Promote,
            ["login"] => Screen::Login,
            ["register"] => Screen::Register,
            _ => Screen::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Screen::Dashboard => DEFAULT_LANDING.to_string(),
            Screen::Products => "/products".to_string(),
            Screen::Customers => "/customers".to_string(),
            Screen::CustomerDetail(id) => format!("/customers/{id}"),
            Screen::Income => "/income".to_string(),
            Screen::Promote => "/promote".to_string(),
            Screen::Login => "/login".to_string(),
            Screen::Register => "/register".to_string(),
            Screen::NotFound => "/404".to_string(),
        }
    }

    /// Login, register and the not-found page are reachable without a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Screen::Login | Screen::Register | Screen::NotFound)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    pub path: &'static str,
}

/// Sidebar entries, in display order.
pub fn sidebar() -> Vec<MenuItem> {
    vec![
        MenuItem { id: "dashboard", label: "Dashboard", path: "/" },
        MenuItem { id: "product", label: "Product", path: "/products" },
        MenuItem { id: "customers", label: "Customers", path: "/customers" },
        MenuItem { id: "income", label: "Income", path: "/income" },
        MenuItem { id: "promote", label: "Promote", path: "/promote" },
        MenuItem { id: "help", label: "Help", path: "/help" },
    ]
}
