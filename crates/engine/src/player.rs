use rack_core::*;
use serde::Deserialize;
use serde::Serialize;

/// Where a player stands within the current hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// In the hand with chips behind.
    Active,
    /// Out of the hand; contributed chips stay in the pot.
    Folded,
    /// All chips committed; stays in the hand but never acts again.
    AllIn,
    /// Seated but skipped when hands are dealt.
    SittingOut,
}

/// A participant in a room.
///
/// Identity is stable across reconnects: `player_id` derives from the
/// client's device id at admission. Chips are the authoritative record of
/// the physical table; every field here is part of the persisted snapshot
/// and the wire contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub player_id: ID<Player>,
    pub name: String,
    pub emoji: String,
    pub chips: Chips,
    /// Seat index, or -1 when unseated.
    pub seat: i32,
    pub ready: bool,
    pub status: PlayerStatus,
    /// Chips in front of the player this street.
    pub current_bet: Chips,
    /// Chips committed across all streets of the current hand.
    pub total_bet_this_hand: Chips,
    pub has_acted_this_street: bool,
    pub is_connected: bool,
    /// Short display tag of the player's latest action.
    pub last_action: Option<String>,
    /// Count of discrete rebuys, each worth `initial_chips`.
    pub total_rebuys: u32,
    /// Count of discrete cashouts, each worth `initial_chips`.
    pub total_cashouts: u32,
}

impl Player {
    pub fn new(player_id: ID<Player>, name: String, emoji: String, chips: Chips) -> Self {
        Self {
            player_id,
            name,
            emoji,
            chips,
            seat: NO_SEAT,
            ready: false,
            status: PlayerStatus::Active,
            current_bet: 0,
            total_bet_this_hand: 0,
            has_acted_this_street: false,
            is_connected: false,
            last_action: None,
            total_rebuys: 0,
            total_cashouts: 0,
        }
    }
    pub fn is_seated(&self) -> bool {
        self.seat >= 0
    }
    /// Seat as a checked index into the seats array.
    pub fn position(&self) -> Option<Position> {
        (self.seat >= 0).then_some(self.seat as Position)
    }
    /// True while the player can still win chips this hand.
    pub fn is_contesting(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }
    /// Moves chips from the stack into the current street's bet.
    /// Exhausting the stack flips the player to all-in.
    pub fn stake(&mut self, amount: Chips) {
        debug_assert!(amount <= self.chips);
        self.chips -= amount;
        self.current_bet += amount;
        self.total_bet_this_hand += amount;
        if self.chips == 0 {
            self.status = PlayerStatus::AllIn;
        }
    }
    /// Clears per-hand state between hands. Chips and counters persist.
    pub fn reset_hand(&mut self) {
        if self.status != PlayerStatus::SittingOut {
            self.status = PlayerStatus::Active;
        }
        self.ready = false;
        self.current_bet = 0;
        self.total_bet_this_hand = 0;
        self.has_acted_this_street = false;
        self.last_action = None;
    }
}

impl Unique for Player {
    fn id(&self) -> ID<Self> {
        self.player_id.clone()
    }
}
