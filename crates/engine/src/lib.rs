//! Pure game engine for chip-tracked No-Limit Hold'em.
//!
//! The table plays with physical cards but no physical chips: this crate
//! is the authoritative ledger. It never deals cards, ranks hands, or
//! picks winners; players declare outcomes and the engine enforces the
//! arithmetic, the turn order, and the multi-party settlement consensus.
//!
//! ## Architecture
//!
//! - [`Room`] — the full snapshot and its single entry point [`Room::apply`]
//! - [`Command`] — every state transition request a client can make
//! - [`GameEvent`] — advisory events accompanying a transition
//! - [`EngineError`] — typed failures; errors never mutate state
//!
//! ## Submodules
//!
//! - `seating` — sit, stand, readiness, rebuy/cashout gates
//! - `dealing` — blinds, button rotation, street boundaries, run-outs
//! - `betting` — turn sequencing, admissibility, raise reopening
//! - `pot` — side-pot stratification and deterministic ids
//! - `settle` — settlement proposals, confirmation, distribution
mod betting;
mod command;
mod dealing;
mod error;
mod event;
mod hand;
mod player;
mod pot;
mod room;
mod seating;
mod settle;

pub use command::*;
pub use error::*;
pub use event::*;
pub use hand::*;
pub use player::*;
pub use pot::Pot;
pub use room::*;
