use huddle_core::{ConnectionId, ServerMessage};
use async_trait::async_trait;

/// Where the hub puts outbound frames.
///
/// The WebSocket side implements this over its connection table; tests swap
/// in a recorder. Delivery to an id that is gone must be a quiet no-op.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn deliver(&self, to: ConnectionId, message: ServerMessage);
}
