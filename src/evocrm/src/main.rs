//! EvoCRM dashboard backend.
//!
//! Main entry point that wires identity, the in-memory store and the API server.

use clap::Parser;
use evocrm_api::ApiServer;
use evocrm_core::config::{AppConfig, IdStrategy};
use evocrm_identity::{
    HttpIdentityProvider, IdentityProvider, InMemoryIdentityProvider, SessionProvider, UnconfiguredProvider,
};
use evocrm_management::CrmStore;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "evocrm")]
#[command(about = "CRM dashboard backend")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "EVOCRM__NODE_ID")]
    node_id: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "EVOCRM__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "EVOCRM__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Start with empty collections instead of the demo records
    #[arg(long, default_value_t = false)]
    no_seed: bool,

    /// Assign new ids as collection length + 1
    #[arg(long, default_value_t = false)]
    legacy_ids: bool,

    /// Use a process-local identity provider with auto-confirmed sign-ups
    #[arg(long, default_value_t = false)]
    local_identity: bool,
}

fn identity_provider(config: &AppConfig, local: bool) -> Arc<dyn IdentityProvider> {
    if local {
        info!("Using process-local identity provider");
        return Arc::new(InMemoryIdentityProvider::new().auto_confirm(true));
    }
    if config.identity.credentials().is_none() {
        warn!("Identity service URL or anon key missing; sign-in is disabled");
        return Arc::new(UnconfiguredProvider::new());
    }
    match HttpIdentityProvider::from_config(&config.identity) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!(error = %e, "Failed to build identity client; sign-in is disabled");
            Arc::new(UnconfiguredProvider::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evocrm=info,evocrm_api=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("EvoCRM starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if cli.no_seed {
        config.store.seed_demo_data = false;
    }
    if cli.legacy_ids {
        config.store.id_strategy = IdStrategy::LegacyLength;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        page_size = config.browser.page_size,
        "Configuration loaded"
    );

    let store = Arc::new(CrmStore::from_config(&config.store));

    let session = Arc::new(SessionProvider::new(identity_provider(&config, cli.local_identity)));
    session.init().await;

    let api_server = ApiServer::new(config.clone(), store, session.clone());

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("EvoCRM is ready to serve traffic");

    // Serve until the server fails or Ctrl-C arrives
    let result = tokio::select! {
        served = api_server.start_http() => served,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    session.teardown();
    result
}
