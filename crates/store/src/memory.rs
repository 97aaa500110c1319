use super::SnapshotStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process snapshot store.
///
/// Backs tests and chip games that accept losing state on restart.
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, room_id: &str, bytes: &[u8]) -> anyhow::Result<()> {
        self.blobs
            .write()
            .await
            .insert(room_id.to_string(), bytes.to_vec());
        Ok(())
    }
    async fn load(&self, room_id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(room_id).cloned())
    }
    async fn delete(&self, room_id: &str) -> anyhow::Result<()> {
        self.blobs.write().await.remove(room_id);
        Ok(())
    }
    async fn list_active(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }
}
