use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server stopped unexpectedly")]
    Serve(#[source] io::Error),

    #[error("signaling hub is no longer running")]
    HubClosed,

    #[error("malformed signaling frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid allowed origin {0:?}")]
    InvalidOrigin(String),
}

pub type Result<T> = std::result::Result<T, SignalingError>;
