use super::*;
use rack_core::*;
use serde::Deserialize;
use serde::Serialize;

/// One row of the end-of-game standings table.
///
/// `net` accounts for the initial buy-in and every discrete rebuy and
/// cashout; the sum across a room's players is zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: ID<Player>,
    pub name: String,
    pub chips: Chips,
    pub total_rebuys: u32,
    pub total_cashouts: u32,
    pub net: Chips,
}

/// Discrete advisory events accompanying a state transition.
///
/// Snapshots are authoritative; events exist so clients can animate and
/// narrate transitions without diffing snapshots. They are delivered in
/// order and never coalesced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// The hand moved to a new street or terminal phase.
    PhaseChange { phase: Phase },
    /// Everyone else folded; the pot was awarded without showdown.
    SingleWinner {
        winner: ID<Player>,
        winner_name: String,
        pot: Chips,
    },
    /// The owner ended the game; final standings attached.
    GameEnded { standings: Vec<Standing> },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GameEvent::PhaseChange { phase } => write!(f, "phase -> {}", phase),
            GameEvent::SingleWinner {
                winner_name, pot, ..
            } => write!(f, "{} wins {} uncontested", winner_name, pot),
            GameEvent::GameEnded { standings } => {
                write!(f, "game over ({} players)", standings.len())
            }
        }
    }
}
