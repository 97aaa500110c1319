//! Async runtime for live chip-tracked poker rooms.
//!
//! Each room is one actor: a single task that owns the authoritative
//! snapshot, serializes every command from clients and timers, persists
//! each accepted transition, and fans the result out to subscribers.
//! Parallelism exists across rooms, never within one.
//!
//! ## Architecture
//!
//! - [`RoomActor`] — serial event loop owning one room snapshot
//! - [`RoomHandle`] — command inbox plus the snapshot watch channel
//! - [`RoomCommand`] — everything that can land in an actor's inbox
//! - [`Protocol`] / [`ClientMessage`] — inbound wire frames
//! - [`ServerMessage`] — outbound wire frames
//! - [`LivenessConfig`] — heartbeat, disconnect, and teardown timing
mod actor;
mod handle;
mod message;
mod protocol;
mod timer;

pub use actor::*;
pub use handle::*;
pub use message::*;
pub use protocol::*;
pub use timer::*;
