use crate::room::RoomRegistry;
use huddle_core::{ClientMessage, ConnectionId, IceServerConfig, RoomId, ServerMessage};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Something that happened on one connection.
#[derive(Debug, Clone)]
pub enum SignalingEvent {
    Connected,
    Message(ClientMessage),
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Accepted, not in any room yet.
    Connected,
    /// Member of at least one room.
    Joined,
}

/// One outbound frame and who gets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub to: ConnectionId,
    pub message: ServerMessage,
}

impl Envelope {
    pub fn new(to: ConnectionId, message: ServerMessage) -> Self {
        Self { to, message }
    }
}

/// Everything the hub knows: live connections and room membership.
///
/// `handle` is the whole protocol. It performs no I/O and returns the frames
/// to deliver, so delivery can happen after the state has been updated.
#[derive(Debug, Default)]
pub struct SignalingState {
    registry: RoomRegistry,
    connections: HashMap<ConnectionId, ConnectionState>,
    ice_servers: Vec<IceServerConfig>,
}

impl SignalingState {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            connections: HashMap::new(),
            ice_servers,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn state_of(&self, id: &ConnectionId) -> Option<ConnectionState> {
        self.connections.get(id).copied()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn joined_count(&self) -> usize {
        self.connections
            .values()
            .filter(|s| **s == ConnectionState::Joined)
            .count()
    }

    pub fn handle(&mut self, from: ConnectionId, event: SignalingEvent) -> Vec<Envelope> {
        match event {
            SignalingEvent::Connected => self.on_connected(from),
            SignalingEvent::Disconnected => self.on_disconnected(from),
            SignalingEvent::Message(msg) => {
                if !self.connections.contains_key(&from) {
                    warn!("Dropping {:?} from unknown connection {}", msg, from);
                    return Vec::new();
                }
                self.on_message(from, msg)
            }
        }
    }

    fn on_connected(&mut self, id: ConnectionId) -> Vec<Envelope> {
        if self.connections.contains_key(&id) {
            warn!("Connection {} registered twice", id);
            return Vec::new();
        }
        self.connections.insert(id, ConnectionState::Connected);
        debug!("Connection {} is live", id);

        let mut out = vec![Envelope::new(id, ServerMessage::Welcome { id })];
        if !self.ice_servers.is_empty() {
            out.push(Envelope::new(
                id,
                ServerMessage::IceConfig {
                    ice_servers: self.ice_servers.clone(),
                },
            ));
        }
        out
    }

    fn on_message(&mut self, from: ConnectionId, msg: ClientMessage) -> Vec<Envelope> {
        match msg {
            ClientMessage::Join { room } => self.on_join(from, room),
            ClientMessage::Offer { target, sdp } => {
                debug!("Offer {} -> {}", from, target);
                self.relay(target, ServerMessage::Offer { sdp, caller: from })
            }
            ClientMessage::Answer { target, sdp } => {
                debug!("Answer {} -> {}", from, target);
                self.relay(target, ServerMessage::Answer { sdp, caller: from })
            }
            ClientMessage::IceCandidate { target, candidate } => {
                debug!("ICE candidate {} -> {}", from, target);
                self.relay(
                    target,
                    ServerMessage::IceCandidate {
                        candidate,
                        from,
                    },
                )
            }
        }
    }

    /// A repeat join leaves membership alone and only resends the roster to the joiner.
    fn on_join(&mut self, id: ConnectionId, room: RoomId) -> Vec<Envelope> {
        let rejoin = self.registry.members_of(room.as_str()).contains(&id);
        let others = self.registry.join(room.clone(), id);

        if let Some(state) = self.connections.get_mut(&id) {
            if *state == ConnectionState::Connected {
                debug!("Connection {} is now joined", id);
            }
            *state = ConnectionState::Joined;
        }

        if rejoin {
            debug!("Connection {} re-joined room '{}'", id, room);
        } else {
            info!("Connection {} joined room '{}'", id, room);
        }

        let mut out = Vec::with_capacity(others.len() + 1);
        if !others.is_empty() {
            out.push(Envelope::new(
                id,
                ServerMessage::OtherUsers {
                    users: others.clone(),
                },
            ));
        }
        if !rejoin {
            out.extend(
                others
                    .into_iter()
                    .map(|member| Envelope::new(member, ServerMessage::UserJoined { id })),
            );
        }
        out
    }

    fn relay(&self, target: ConnectionId, message: ServerMessage) -> Vec<Envelope> {
        if !self.connections.contains_key(&target) {
            debug!("Relay target {} is not connected, dropping", target);
            return Vec::new();
        }
        vec![Envelope::new(target, message)]
    }

    fn on_disconnected(&mut self, id: ConnectionId) -> Vec<Envelope> {
        if self.connections.remove(&id).is_none() {
            return Vec::new();
        }

        let affected = self.registry.leave(&id);
        let mut out = Vec::new();
        for (room, remaining) in affected {
            info!("Connection {} left room '{}'", id, room);
            out.extend(
                remaining
                    .into_iter()
                    .map(|member| Envelope::new(member, ServerMessage::UserDisconnected { id })),
            );
        }
        out
    }
}
