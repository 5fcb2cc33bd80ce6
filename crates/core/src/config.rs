use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `EVOCRM__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Hosted identity service connection. Both `url` and `anon_key` must be
/// set for the HTTP provider to be used.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "default_identity_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub password_reset_redirect: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

/// How new record ids are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Counter that only moves forward; ids are never reused after deletes.
    #[default]
    Monotonic,
    /// `collection length + 1`. Collides after deletions.
    LegacyLength,
}

// Default functions
fn default_node_id() -> String {
    "evocrm-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_identity_timeout_ms() -> u64 {
    10_000
}
fn default_page_size() -> usize {
    8
}
fn default_seed_demo_data() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_ms: default_identity_timeout_ms(),
            password_reset_redirect: None,
        }
    }
}

impl IdentityConfig {
    /// Returns `(url, anon_key)` when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.anon_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((url, key))
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            identity: IdentityConfig::default(),
            browser: BrowserConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("EVOCRM")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
