//! Hosting layer: the room registry, admission, and client sessions.
//!
//! ## Architecture
//!
//! - [`Lobby`] — process-wide registry of live room actors, restored
//!   from the snapshot store at boot
//! - `admission` — create/join/find/leave, idempotent by device id
//! - [`session::serve`] — WebSocket bridge binding one client to one
//!   player in one room
mod admission;
pub mod dto;
mod lobby;
mod profile;
pub mod session;

pub use dto::*;
pub use lobby::*;
pub use profile::*;
