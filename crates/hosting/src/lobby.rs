use rack_core::*;
use rack_engine::*;
use rack_gameroom::*;
use rack_store::SnapshotStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide registry of live rooms.
///
/// Each entry owns a handle to a spawned [`RoomActor`]; room state is
/// never touched outside its actor. The registry itself is the only
/// cross-actor shared structure besides the snapshot store.
pub struct Lobby {
    store: Arc<dyn SnapshotStore>,
    rooms: RwLock<HashMap<ID<Room>, RoomHandle>>,
}

impl Lobby {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            rooms: RwLock::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        self.store.clone()
    }

    /// Reconstitutes every persisted room into a live actor. Called once
    /// at boot; corrupt payloads are skipped with a complaint.
    pub async fn restore(self: &Arc<Self>) -> anyhow::Result<usize> {
        let mut restored = 0;
        for id in self.store.list_active().await? {
            let bytes = match self.store.load(&id).await? {
                Some(bytes) => bytes,
                None => continue,
            };
            match serde_json::from_slice::<Room>(&bytes) {
                Ok(room) => {
                    self.open(room).await?;
                    restored += 1;
                }
                Err(e) => log::error!("[lobby] skipping corrupt snapshot {}: {}", id, e),
            }
        }
        log::info!("[lobby] restored {} rooms", restored);
        Ok(restored)
    }

    /// Persists the room, spawns its actor, and registers the handle.
    /// A cleanup task unregisters the room when the actor retires.
    pub async fn open(self: &Arc<Self>, room: Room) -> anyhow::Result<RoomHandle> {
        let id = room.id.clone();
        let bytes = serde_json::to_vec(&room)?;
        self.store.save(id.as_str(), &bytes).await?;
        let (handle, done) = RoomActor::spawn(room, self.store.clone());
        self.rooms.write().await.insert(id.clone(), handle.clone());
        let lobby = self.clone();
        tokio::spawn(async move {
            let _ = done.await;
            lobby.rooms.write().await.remove(&id);
            log::info!("[lobby] room {} cleaned up", id);
        });
        Ok(handle)
    }

    pub async fn lookup(&self, id: &ID<Room>) -> Option<RoomHandle> {
        self.rooms.read().await.get(id).cloned()
    }

    /// The room a player currently belongs to, if any.
    pub async fn find_player(&self, player: &ID<Player>) -> Option<ID<Room>> {
        for (id, handle) in self.rooms.read().await.iter() {
            if handle.snapshot().players.contains_key(player) {
                return Some(id.clone());
            }
        }
        None
    }

    /// Latest snapshot of every live room.
    pub async fn snapshots(&self) -> Vec<Room> {
        self.rooms
            .read()
            .await
            .values()
            .map(|handle| handle.snapshot())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_store::MemoryStore;

    fn room(id: &str) -> Room {
        let config = RoomConfig {
            sb_amount: 10,
            initial_chips: 1000,
            rebuy_minimum: 0,
            max_chips: 0,
            hand_interval: 0,
        };
        let room = Room::new(ID::from(id), ID::from("owner"), config);
        let (room, _) = room
            .apply(
                &ID::from("owner"),
                Command::Join {
                    name: "owner".to_string(),
                    emoji: "🦉".to_string(),
                },
            )
            .unwrap();
        room
    }

    #[tokio::test]
    async fn open_then_lookup() {
        let lobby = Lobby::new(Arc::new(MemoryStore::new()));
        lobby.open(room("R1")).await.unwrap();
        assert!(lobby.lookup(&ID::from("R1")).await.is_some());
        assert!(lobby.lookup(&ID::from("R2")).await.is_none());
    }

    #[tokio::test]
    async fn restore_brings_rooms_back() {
        let store = Arc::new(MemoryStore::new());
        {
            let lobby = Lobby::new(store.clone());
            lobby.open(room("R1")).await.unwrap();
            lobby.open(room("R2")).await.unwrap();
        }
        // Fresh process, same store.
        let lobby = Lobby::new(store);
        assert_eq!(lobby.restore().await.unwrap(), 2);
        assert!(lobby.lookup(&ID::from("R1")).await.is_some());
        assert!(lobby.lookup(&ID::from("R2")).await.is_some());
    }

    #[tokio::test]
    async fn find_player_scans_rooms() {
        let lobby = Lobby::new(Arc::new(MemoryStore::new()));
        lobby.open(room("R1")).await.unwrap();
        assert_eq!(
            lobby.find_player(&ID::from("owner")).await,
            Some(ID::from("R1"))
        );
        assert_eq!(lobby.find_player(&ID::from("nobody")).await, None);
    }
}
