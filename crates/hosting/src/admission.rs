use super::dto::*;
use super::lobby::Lobby;
use rack_core::*;
use rack_engine::*;
use rack_gameroom::RoomCommand;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Room codes avoid lookalike characters so they survive being read
/// aloud across a table.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 6;
/// Budget for a room actor to answer an admission request.
const REPLY_BUDGET: std::time::Duration = std::time::Duration::from_secs(5);

/// Admission: creating, joining, finding, and leaving rooms.
///
/// Identity is idempotent under the device id: the same device always
/// maps to the same player id, so reloads and reconnects reattach
/// instead of duplicating players.
impl Lobby {
    pub async fn create_room(self: &Arc<Self>, req: CreateRoomRequest) -> Result<Admitted, EngineError> {
        let config = RoomConfig {
            sb_amount: req.sb_amount,
            initial_chips: req.initial_chips,
            rebuy_minimum: req.rebuy_minimum,
            max_chips: req.max_chips.unwrap_or(0),
            hand_interval: req.hand_interval.unwrap_or(0),
        };
        config.validate()?;
        let player_id = identity(&req.device_id);
        let room_id = self.fresh_code().await;
        let room = Room::new(room_id.clone(), player_id.clone(), config);
        let (room, _) = room.apply(
            &player_id,
            Command::Join {
                name: req.player_name,
                emoji: req.player_emoji,
            },
        )?;
        // The owner takes seat 0 straight away.
        let (room, _) = room.apply(&player_id, Command::Sit { seat: 0 })?;
        self.open(room)
            .await
            .map_err(|e| EngineError::Internal(e.to_string()))?;
        log::info!("[lobby] room {} created by {}", room_id, player_id);
        Ok(Admitted {
            room_id: room_id.to_string(),
            player_id: player_id.to_string(),
        })
    }

    pub async fn join_room(self: &Arc<Self>, req: JoinRoomRequest) -> Result<Admitted, EngineError> {
        let room_id: ID<Room> = ID::from(req.room_id.as_str());
        let handle = self
            .lookup(&room_id)
            .await
            .ok_or_else(|| EngineError::NotFound(format!("room {}", room_id)))?;
        let player_id = identity(&req.device_id);
        // Idempotent: a returning device reattaches to its player record,
        // a new one joins unseated.
        self.transition(
            &handle.id,
            &player_id,
            Command::Join {
                name: req.player_name,
                emoji: req.player_emoji,
            },
        )
        .await?;
        Ok(Admitted {
            room_id: room_id.to_string(),
            player_id: player_id.to_string(),
        })
    }

    pub async fn leave_room(
        self: &Arc<Self>,
        room_id: &ID<Room>,
        player_id: &ID<Player>,
    ) -> Result<(), EngineError> {
        self.transition(room_id, player_id, Command::Leave).await
    }

    /// The public room listing.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        self.snapshots()
            .await
            .into_iter()
            .map(|room| {
                let owner = room.players.get(&room.owner_id);
                RoomSummary {
                    id: room.id.to_string(),
                    owner_name: owner.map(|p| p.name.clone()).unwrap_or_default(),
                    owner_emoji: owner.map(|p| p.emoji.clone()).unwrap_or_default(),
                    sb_amount: room.sb_amount,
                    bb_amount: room.bb_amount,
                    initial_chips: room.initial_chips,
                    player_count: room.players.len(),
                    status: serde_json::to_value(room.status)
                        .ok()
                        .and_then(|v| v.as_str().map(String::from))
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Routes one engine command through the room's actor and waits for
    /// the verdict.
    async fn transition(
        &self,
        room_id: &ID<Room>,
        player_id: &ID<Player>,
        command: Command,
    ) -> Result<(), EngineError> {
        let handle = self
            .lookup(room_id)
            .await
            .ok_or_else(|| EngineError::NotFound(format!("room {}", room_id)))?;
        let (tx, rx) = oneshot::channel();
        if !handle.send(RoomCommand::Engine {
            player_id: player_id.clone(),
            command,
            reply: Some(tx),
        }) {
            return Err(EngineError::NotFound(format!("room {}", room_id)));
        }
        tokio::time::timeout(REPLY_BUDGET, rx)
            .await
            .map_err(|_| EngineError::Internal("room actor timed out".to_string()))?
            .map_err(|_| EngineError::Internal("room actor dropped the request".to_string()))?
    }

    /// A short human-readable room code nobody is using yet.
    async fn fresh_code(&self) -> ID<Room> {
        let mut rng = SmallRng::from_os_rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            let id = ID::from(code);
            if self.lookup(&id).await.is_none() {
                return id;
            }
        }
    }
}

/// Stable player identity: the device id when the client supplies one,
/// otherwise a fresh id the client is expected to keep.
fn identity(device_id: &Option<String>) -> ID<Player> {
    match device_id {
        Some(device) if !device.is_empty() => ID::from(device.as_str()),
        _ => ID::default(),
    }
}
