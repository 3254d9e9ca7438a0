//! Server configuration

use crate::error::SignalingError;
use axum::http::{HeaderValue, Method};
use huddle_core::IceServerConfig;
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Which browser origin may open the signaling socket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedOrigin {
    #[default]
    Any,
    Exact(HeaderValue),
}

impl AllowedOrigin {
    /// Non-browser clients send no `Origin` header and are always let through.
    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        match (self, origin) {
            (AllowedOrigin::Any, _) | (_, None) => true,
            (AllowedOrigin::Exact(allowed), Some(origin)) => allowed == origin,
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let allow_origin = match self {
            AllowedOrigin::Any => AllowOrigin::from(Any),
            AllowedOrigin::Exact(origin) => AllowOrigin::exact(origin.clone()),
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

impl FromStr for AllowedOrigin {
    type Err = SignalingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(AllowedOrigin::Any);
        }
        HeaderValue::from_str(s)
            .map(AllowedOrigin::Exact)
            .map_err(|_| SignalingError::InvalidOrigin(s.to_string()))
    }
}

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Cross-origin caller allowed to use the transport
    pub allowed_origin: AllowedOrigin,

    /// Handed to every client right after it connects
    pub ice_servers: Vec<IceServerConfig>,

    /// Bound of the hub command queue
    pub hub_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            allowed_origin: AllowedOrigin::Any,
            ice_servers: Vec::new(),
            hub_capacity: 256,
        }
    }
}

impl ServerConfig {
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn allowed_origin(mut self, origin: AllowedOrigin) -> Self {
        self.allowed_origin = origin;
        self
    }

    pub fn ice_server(mut self, server: IceServerConfig) -> Self {
        self.ice_servers.push(server);
        self
    }

    pub fn hub_capacity(mut self, capacity: usize) -> Self {
        self.hub_capacity = capacity.max(1);
        self
    }
}
