use crate::error::{Result, SignalingError};
use crate::signaling::{Hub, HubCommand, HubStats, SignalingEvent, SignalingOutput};
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_core::{ConnectionId, IceServerConfig, RoomId, ServerMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Outbound socket queues of every live connection.
///
/// This is all the hub delivers through. It holds no hub sender, so the hub
/// stops once the last `SignalingService` is dropped.
#[derive(Default)]
pub struct PeerTable {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

impl PeerTable {
    pub fn send_signal(&self, id: ConnectionId, msg: ServerMessage) {
        let Some(peer) = self.peers.get(&id) else {
            debug!("Dropping {:?} for disconnected connection {}", msg, id);
            return;
        };
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if let Err(e) = peer.send(Message::Text(json.into())) {
                    debug!("Connection {} is closing, frame lost: {:?}", id, e);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}

#[async_trait]
impl SignalingOutput for PeerTable {
    async fn deliver(&self, to: ConnectionId, message: ServerMessage) {
        self.send_signal(to, message);
    }
}

/// Connection table plus the handle to the hub task.
///
/// Cheap to clone; every WebSocket task holds one.
#[derive(Clone)]
pub struct SignalingService {
    peers: Arc<PeerTable>,
    hub_tx: mpsc::Sender<HubCommand>,
}

impl SignalingService {
    pub fn new(peers: Arc<PeerTable>, hub_tx: mpsc::Sender<HubCommand>) -> Self {
        Self { peers, hub_tx }
    }

    /// Spawns a hub delivering through a fresh peer table and returns its service.
    pub fn start(ice_servers: Vec<IceServerConfig>, hub_capacity: usize) -> Self {
        let (hub_tx, hub_rx) = mpsc::channel(hub_capacity);
        let peers = Arc::new(PeerTable::default());

        let hub = Hub::new(ice_servers, hub_rx, peers.clone());
        tokio::spawn(hub.run());

        Self::new(peers, hub_tx)
    }

    pub fn add_peer(&self, id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.peers.insert(id, tx);
    }

    pub fn remove_peer(&self, id: &ConnectionId) {
        self.peers.peers.remove(id);
    }

    pub async fn submit(&self, from: ConnectionId, event: SignalingEvent) -> Result<()> {
        self.hub_tx
            .send(HubCommand::Event { from, event })
            .await
            .map_err(|_| SignalingError::HubClosed)
    }

    pub async fn members_of(&self, room: impl Into<RoomId>) -> Result<Vec<ConnectionId>> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx
            .send(HubCommand::MembersOf {
                room: room.into(),
                reply,
            })
            .await
            .map_err(|_| SignalingError::HubClosed)?;
        rx.await.map_err(|_| SignalingError::HubClosed)
    }

    pub async fn stats(&self) -> Result<HubStats> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx
            .send(HubCommand::Stats { reply })
            .await
            .map_err(|_| SignalingError::HubClosed)?;
        rx.await.map_err(|_| SignalingError::HubClosed)
    }
}
