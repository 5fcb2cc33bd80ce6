//! API server for the auth, dashboard and operational endpoints.

use crate::rest::{self, AppState};
use crate::{auth_rest, guard, navigation_rest};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use evocrm_core::config::AppConfig;
use evocrm_identity::SessionProvider;
use evocrm_management::{management_router, CrmStore, ManagementState, Pages};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    store: Arc<CrmStore>,
    session: Arc<SessionProvider>,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: Arc<CrmStore>, session: Arc<SessionProvider>) -> Self {
        Self {
            config,
            store,
            session,
        }
    }

    /// Full application router. Dashboard routes sit behind the session
    /// guard; unknown paths fall through to a JSON 404.
    pub fn router(&self) -> Router {
        let management = ManagementState::new(
            self.store.clone(),
            Pages::new(self.config.browser.page_size),
        );

        let protected = management_router(management)
            .merge(
                Router::new()
                    .route("/api/v1/navigation", get(navigation_rest::navigation))
                    .with_state(self.session.clone()),
            )
            .route_layer(middleware::from_fn_with_state(
                self.session.clone(),
                guard::require_session,
            ));

        let auth = Router::new()
            .route("/api/v1/auth/sign-in", post(auth_rest::sign_in))
            .route("/api/v1/auth/sign-up", post(auth_rest::sign_up))
            .route("/api/v1/auth/forgot-password", post(auth_rest::forgot_password))
            .route("/api/v1/auth/logout", post(auth_rest::logout))
            .route("/api/v1/auth/session", get(auth_rest::current_session))
            .with_state(self.session.clone());

        let ops = Router::new()
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .with_state(AppState {
                node_id: self.config.node_id.clone(),
                start_time: Instant::now(),
                session: self.session.clone(),
            });

        Router::new()
            .merge(protected)
            .merge(auth)
            .merge(ops)
            .fallback(rest::not_found)
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus exporter on its own port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
