use crate::config::{AllowedOrigin, ServerConfig};
use crate::error::{Result, SignalingError};
use crate::signaling::{HubStats, SignalingService, ws_handler};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub signaling: SignalingService,
    pub allowed_origin: AllowedOrigin,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: HubStats,
}

pub fn router(state: AppState) -> Router {
    let cors = state.allowed_origin.cors_layer();

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthReport>, StatusCode> {
    match state.signaling.stats().await {
        Ok(stats) => Ok(Json(HealthReport { status: "ok", stats })),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// A bound listener with its hub already running.
pub struct SignalingServer {
    listener: TcpListener,
    state: AppState,
}

impl SignalingServer {
    /// Binds the listening socket and starts the hub.
    ///
    /// Fails without starting anything if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| SignalingError::Bind {
                addr: config.bind_addr,
                source,
            })?;

        let signaling = SignalingService::start(config.ice_servers, config.hub_capacity);

        Ok(Self {
            listener,
            state: AppState {
                signaling,
                allowed_origin: config.allowed_origin,
            },
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(SignalingError::Serve)
    }

    pub fn signaling(&self) -> &SignalingService {
        &self.state.signaling
    }

    pub async fn run(self) -> Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Signaling server listening on http://{}", addr);
        }

        axum::serve(self.listener, router(self.state))
            .await
            .map_err(SignalingError::Serve)
    }
}
