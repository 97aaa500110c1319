use rack_engine::*;
use serde::Serialize;

/// Messages sent from server to client over WebSocket.
///
/// `room_state` snapshots are authoritative and may be coalesced on slow
/// links; `event` frames are advisory and are never coalesced. `error`
/// frames are transient and only ever go to the player who caused them.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Heartbeat reply echoing the client timestamp verbatim.
    Pong { timestamp: serde_json::Value },
    /// Full authoritative snapshot of the room.
    RoomState { room: Room },
    /// Discrete advisory event accompanying a transition.
    Event {
        #[serde(flatten)]
        event: GameEvent,
    },
    /// Transient failure; display briefly and discard.
    Error { message: String },
}

impl ServerMessage {
    pub fn pong(timestamp: serde_json::Value) -> Self {
        Self::Pong { timestamp }
    }
    pub fn room_state(room: Room) -> Self {
        Self::RoomState { room }
    }
    pub fn event(event: GameEvent) -> Self {
        Self::Event { event }
    }
    pub fn error(error: &EngineError) -> Self {
        Self::Error {
            message: error.to_string(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}
