use super::*;
use rack_core::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Streets and terminal states of a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    HandStart,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    HandEnd,
}

impl Phase {
    /// The street that follows this one. Betting phases walk toward
    /// showdown; terminal phases stay put.
    pub fn next(self) -> Phase {
        match self {
            Phase::HandStart => Phase::Preflop,
            Phase::Preflop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            Phase::Showdown => Phase::HandEnd,
            Phase::HandEnd => Phase::HandEnd,
        }
    }
    /// True during an open betting street.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Phase::HandStart => "hand_start",
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
            Phase::HandEnd => "hand_end",
        };
        write!(f, "{}", s)
    }
}

/// A declared outcome awaiting multi-party ratification.
///
/// Winners are declared by a player at showdown (the server never sees
/// cards) and the hand settles only once every non-folded seated player
/// has confirmed. Confirmations are sticky for the proposal instance;
/// replacing a proposal requires the proposer or an explicit rejection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementProposal {
    pub proposer_id: ID<Player>,
    /// Pot id to the non-empty subset of that pot's eligibles winning it.
    pub pot_winners: BTreeMap<String, BTreeSet<ID<Player>>>,
    pub confirmed_by: BTreeSet<ID<Player>>,
}

/// Authoritative state of the hand in progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandState {
    pub phase: Phase,
    pub dealer_seat: Position,
    pub sb_seat: Position,
    pub bb_seat: Position,
    /// Highest `current_bet` this street.
    pub current_bet: Chips,
    /// Sum of all `total_bet_this_hand`.
    pub pot: Chips,
    /// Main pot first, rebuilt at every street boundary.
    pub pots: Vec<Pot>,
    /// Whose turn it is; null between streets and during settlement.
    pub current_player_id: Option<ID<Player>>,
    /// Hand participants rotated so the first to act this street is at
    /// index 0. Folded and all-in players remain listed but are skipped.
    pub action_order: Vec<ID<Player>>,
    pub action_index: usize,
    /// Who opened or last fully re-raised this street.
    pub last_raiser_id: Option<ID<Player>>,
    pub settlement_proposal: Option<SettlementProposal>,
}

impl HandState {
    pub fn new(dealer_seat: Position, sb_seat: Position, bb_seat: Position) -> Self {
        Self {
            phase: Phase::HandStart,
            dealer_seat,
            sb_seat,
            bb_seat,
            current_bet: 0,
            pot: 0,
            pots: Vec::new(),
            current_player_id: None,
            action_order: Vec::new(),
            action_index: 0,
            last_raiser_id: None,
            settlement_proposal: None,
        }
    }
    /// True if the player was dealt into this hand.
    pub fn contains(&self, player: &ID<Player>) -> bool {
        self.action_order.contains(player)
    }
}
