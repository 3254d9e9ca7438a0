mod connection;
mod room;
mod signaling;

pub use connection::{ConnectionId, ParseConnectionIdError};
pub use room::RoomId;
pub use signaling::{ClientMessage, IceServerConfig, ServerMessage};
