use super::SnapshotStore;
use std::sync::Arc;
use tokio_postgres::Client;

/// Table holding one snapshot blob per room.
const SNAPSHOTS: &str = "room_snapshots";

/// PostgreSQL-backed snapshot store.
///
/// One row per room; `INSERT ... ON CONFLICT DO UPDATE` gives the
/// single-key atomic replace the contract asks for.
pub struct PgStore {
    db: Arc<Client>,
}

impl PgStore {
    pub fn new(db: Arc<Client>) -> Self {
        Self { db }
    }
    /// Creates the snapshot table if missing. Call once at boot.
    pub async fn init(&self) -> anyhow::Result<()> {
        self.db
            .batch_execute(const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SNAPSHOTS,
                " (
                    id          TEXT PRIMARY KEY,
                    snapshot    BYTEA NOT NULL,
                    updated_at  BIGINT NOT NULL
                );"
            ))
            .await?;
        Ok(())
    }
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Connects to PostgreSQL and spawns the connection driver task.
pub async fn connect(url: &str) -> anyhow::Result<Arc<Client>> {
    let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("[store] postgres connection lost: {}", e);
        }
    });
    Ok(Arc::new(client))
}

#[async_trait::async_trait]
impl SnapshotStore for PgStore {
    async fn save(&self, room_id: &str, bytes: &[u8]) -> anyhow::Result<()> {
        self.db
            .execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    SNAPSHOTS,
                    " (id, snapshot, updated_at) VALUES ($1, $2, $3)
                     ON CONFLICT (id) DO UPDATE
                     SET snapshot = EXCLUDED.snapshot, updated_at = EXCLUDED.updated_at"
                ),
                &[&room_id, &bytes, &Self::now()],
            )
            .await?;
        Ok(())
    }
    async fn load(&self, room_id: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let row = self
            .db
            .query_opt(
                const_format::concatcp!("SELECT snapshot FROM ", SNAPSHOTS, " WHERE id = $1"),
                &[&room_id],
            )
            .await?;
        Ok(row.map(|r| r.get::<_, Vec<u8>>(0)))
    }
    async fn delete(&self, room_id: &str) -> anyhow::Result<()> {
        self.db
            .execute(
                const_format::concatcp!("DELETE FROM ", SNAPSHOTS, " WHERE id = $1"),
                &[&room_id],
            )
            .await?;
        Ok(())
    }
    async fn list_active(&self) -> anyhow::Result<Vec<String>> {
        let rows = self
            .db
            .query(const_format::concatcp!("SELECT id FROM ", SNAPSHOTS), &[])
            .await?;
        Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect())
    }
}
