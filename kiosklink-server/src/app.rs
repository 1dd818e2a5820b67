use crate::broker::Broker;
use crate::config::ServerConfig;
use crate::registry::RegistryHandle;
use crate::signaling::{SignalingService, customer_ws_handler, kiosk_ws_handler};
use anyhow::Context;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub broker: Broker,
    pub signaling: SignalingService,
    pub registry: RegistryHandle,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Spawns the registry loop, so it must be called inside a runtime.
    pub fn new(config: ServerConfig) -> Self {
        let registry = RegistryHandle::spawn(config.registry_capacity);
        let signaling = SignalingService::new();
        let broker = Broker::new(registry.clone(), Arc::new(signaling.clone()));

        Self {
            broker,
            signaling,
            registry,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/kiosk", get(kiosk_ws_handler))
        .route("/customer", get(customer_ws_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    match state.registry.snapshot().await {
        Ok(snapshot) => format!(
            "ok kiosks={} customers={} pairings={} sessions={}\n",
            snapshot.kiosks,
            snapshot.customers,
            snapshot.pairings.len(),
            state.signaling.session_count()
        )
        .into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

pub async fn serve(
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    serve_with_listener(listener, config, shutdown).await
}

/// Runs the broker on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    let app = build_router(AppState::new(config));

    info!("Signaling broker listening on ws://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server terminated unexpectedly")?;

    info!("Signaling broker stopped");
    Ok(())
}
