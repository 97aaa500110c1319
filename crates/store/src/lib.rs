//! Room snapshot persistence.
//!
//! The store is a key→blob table: one opaque payload per room, replaced
//! atomically on every accepted command. It is the source of truth across
//! process restarts; on boot every listed room is reconstituted into a
//! live actor.
//!
//! Two implementations share the [`SnapshotStore`] contract:
//!
//! - [`MemoryStore`] — in-process map for tests and ephemeral deployments
//! - [`PgStore`] — single-table PostgreSQL store for durable deployments
mod memory;
mod postgres;

pub use memory::*;
pub use postgres::*;

/// Key→blob persistence keyed by room id.
///
/// `save` atomically replaces the payload; there are no transactions or
/// partial writes to reason about. Implementations must be safe to share
/// behind an `Arc` across room actors.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Atomically replaces the room's snapshot.
    async fn save(&self, room_id: &str, bytes: &[u8]) -> anyhow::Result<()>;
    /// Returns the latest saved snapshot, or None if the room is unknown.
    async fn load(&self, room_id: &str) -> anyhow::Result<Option<Vec<u8>>>;
    /// Forgets the room entirely.
    async fn delete(&self, room_id: &str) -> anyhow::Result<()>;
    /// Enumerates every persisted room id.
    async fn list_active(&self) -> anyhow::Result<Vec<String>>;
}
