use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Frames a browser sends to the hub.
///
/// `sdp` and `candidate` are whatever the browser produced; they are carried
/// as raw JSON and never looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    Join {
        room: RoomId,
    },
    Offer {
        target: ConnectionId,
        sdp: Value,
    },
    Answer {
        target: ConnectionId,
        sdp: Value,
    },
    IceCandidate {
        target: ConnectionId,
        candidate: Value,
    },
}

/// Frames the hub sends to a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Welcome {
        id: ConnectionId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    OtherUsers {
        users: Vec<ConnectionId>,
    },
    UserJoined {
        id: ConnectionId,
    },
    Offer {
        sdp: Value,
        caller: ConnectionId,
    },
    Answer {
        sdp: Value,
        caller: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        from: ConnectionId,
    },
    UserDisconnected {
        id: ConnectionId,
    },
}
