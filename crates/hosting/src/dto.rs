use rack_core::Chips;
use serde::Deserialize;
use serde::Serialize;

/// Body of `POST /rooms`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub player_name: String,
    pub player_emoji: String,
    pub sb_amount: Chips,
    pub initial_chips: Chips,
    pub rebuy_minimum: Chips,
    #[serde(default)]
    pub hand_interval: Option<u64>,
    #[serde(default)]
    pub max_chips: Option<Chips>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Body of `POST /rooms/join`.
#[derive(Clone, Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub room_id: String,
    pub player_name: String,
    pub player_emoji: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Successful admission into a room.
#[derive(Clone, Debug, Serialize)]
pub struct Admitted {
    pub room_id: String,
    pub player_id: String,
}

/// One row of the public room listing.
#[derive(Clone, Debug, Serialize)]
pub struct RoomSummary {
    pub id: String,
    pub owner_name: String,
    pub owner_emoji: String,
    pub sb_amount: Chips,
    pub bb_amount: Chips,
    pub initial_chips: Chips,
    pub player_count: usize,
    pub status: String,
}

/// Reply to `GET /player-room/{player_id}`.
#[derive(Clone, Debug, Serialize)]
pub struct ActiveRoom {
    pub room_id: Option<String>,
}

/// Reply to `GET /random-profile`.
#[derive(Clone, Debug, Serialize)]
pub struct Profile {
    pub name: String,
    pub emoji: String,
}
