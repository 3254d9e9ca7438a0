use crate::signaling::{SignalingEvent, SignalingOutput, SignalingState};
use huddle_core::{ConnectionId, IceServerConfig, RoomId};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Requests the hub task understands.
#[derive(Debug)]
pub enum HubCommand {
    /// Something happened on a connection.
    Event {
        from: ConnectionId,
        event: SignalingEvent,
    },

    /// Snapshot of one room's members.
    MembersOf {
        room: RoomId,
        reply: oneshot::Sender<Vec<ConnectionId>>,
    },

    Stats { reply: oneshot::Sender<HubStats> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub joined: usize,
    pub rooms: usize,
}

/// Sole owner of room state.
///
/// Commands are handled one at a time, so a join or leave and the membership
/// snapshot it fans out to are always consistent with each other.
pub struct Hub {
    state: SignalingState,
    command_rx: mpsc::Receiver<HubCommand>,
    output: Arc<dyn SignalingOutput>,
}

impl Hub {
    pub fn new(
        ice_servers: Vec<IceServerConfig>,
        command_rx: mpsc::Receiver<HubCommand>,
        output: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            state: SignalingState::new(ice_servers),
            command_rx,
            output,
        }
    }

    pub async fn run(mut self) {
        info!("Signaling hub started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Signaling hub finished");
    }

    async fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Event { from, event } => {
                let envelopes = self.state.handle(from, event);
                for envelope in envelopes {
                    self.output.deliver(envelope.to, envelope.message).await;
                }
            }

            HubCommand::MembersOf { room, reply } => {
                let members = self.state.registry().members_of(room.as_str());
                if reply.send(members).is_err() {
                    debug!("MembersOf caller went away");
                }
            }

            HubCommand::Stats { reply } => {
                let stats = HubStats {
                    connections: self.state.connection_count(),
                    joined: self.state.joined_count(),
                    rooms: self.state.registry().room_count(),
                };
                let _ = reply.send(stats);
            }
        }
    }
}
