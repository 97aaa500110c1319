use super::*;
use rack_core::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Room lifecycle. `Playing` exactly while a hand exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// Stakes and house rules fixed at room creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomConfig {
    pub sb_amount: Chips,
    pub initial_chips: Chips,
    /// 0 means rebuy only at zero chips.
    pub rebuy_minimum: Chips,
    /// 0 means unlimited; otherwise forced cashout above this.
    pub max_chips: Chips,
    /// Seconds between hands, surfaced to clients for their timers.
    pub hand_interval: u64,
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let bb = self.sb_amount * 2;
        if self.sb_amount <= 0 {
            return Err(EngineError::Validation("small blind must be positive".into()));
        }
        if self.initial_chips < bb * 2 {
            return Err(EngineError::Validation(
                "initial chips must cover at least two big blinds".into(),
            ));
        }
        if self.rebuy_minimum < 0 {
            return Err(EngineError::Validation("rebuy minimum must not be negative".into()));
        }
        if self.max_chips != 0 && self.max_chips <= self.initial_chips {
            return Err(EngineError::Validation(
                "max chips must be zero or above the initial buy-in".into(),
            ));
        }
        Ok(())
    }
}

/// The authoritative room snapshot.
///
/// This is simultaneously the engine's working state, the persisted blob,
/// and the `room_state` wire payload; field names and enum spellings are
/// the client contract. All transitions go through [`Room::apply`], which
/// never mutates the receiver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub id: ID<Room>,
    pub status: RoomStatus,
    pub owner_id: ID<Player>,
    pub sb_amount: Chips,
    pub bb_amount: Chips,
    pub initial_chips: Chips,
    pub rebuy_minimum: Chips,
    pub max_chips: Chips,
    pub hand_interval: u64,
    pub players: BTreeMap<ID<Player>, Player>,
    /// Seat index to occupant; length is always [`SEATS`].
    pub seats: Vec<Option<ID<Player>>>,
    pub hand: Option<HandState>,
    /// Completed hands. 0 before the first hand finishes.
    pub hand_number: u64,
    /// Button memory across hands; -1 before the first hand.
    pub dealer_seat: i32,
}

impl Room {
    pub fn new(id: ID<Room>, owner_id: ID<Player>, config: RoomConfig) -> Self {
        Self {
            id,
            status: RoomStatus::Waiting,
            owner_id,
            sb_amount: config.sb_amount,
            bb_amount: config.sb_amount * 2,
            initial_chips: config.initial_chips,
            rebuy_minimum: config.rebuy_minimum,
            max_chips: config.max_chips,
            hand_interval: config.hand_interval,
            players: BTreeMap::new(),
            seats: vec![None; SEATS],
            hand: None,
            hand_number: 0,
            dealer_seat: NO_SEAT,
        }
    }

    /// Applies one command for the given player, returning the successor
    /// snapshot and the advisory events the transition emitted. Errors
    /// leave the receiver untouched.
    pub fn apply(
        &self,
        actor: &ID<Player>,
        command: Command,
    ) -> Result<(Room, Vec<GameEvent>), EngineError> {
        log::debug!("[room {}] {} from {}", self.id, command, actor);
        let mut next = self.clone();
        let mut events = Vec::new();
        match command {
            Command::Join { name, emoji } => next.join(actor, name, emoji)?,
            Command::Sit { seat } => next.sit(actor, seat)?,
            Command::Stand => next.stand(actor)?,
            Command::Ready { ready } => next.set_ready(actor, ready, &mut events)?,
            Command::Rebuy => next.rebuy(actor)?,
            Command::Cashout => next.cashout(actor)?,
            Command::Leave => next.leave(actor)?,
            Command::Action { kind, amount } => next.action(actor, kind, amount, &mut events)?,
            Command::Propose { pot_winners } => next.propose(actor, pot_winners)?,
            Command::Confirm => next.confirm(actor, &mut events)?,
            Command::Reject => next.reject(actor)?,
            Command::EndGame => next.end_game(actor, &mut events)?,
        }
        Ok((next, events))
    }
}

/// Lookup and seat-geometry helpers.
impl Room {
    pub fn player(&self, id: &ID<Player>) -> Result<&Player, EngineError> {
        self.players
            .get(id)
            .ok_or_else(|| EngineError::NotFound(format!("player {}", id)))
    }
    pub(crate) fn player_mut(&mut self, id: &ID<Player>) -> Result<&mut Player, EngineError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(format!("player {}", id)))
    }
    /// Occupant of a seat, if any.
    pub fn seated_at(&self, seat: Position) -> Option<&Player> {
        self.seats
            .get(seat)
            .and_then(|s| s.as_ref())
            .and_then(|id| self.players.get(id))
    }
    /// Seated players in seat order.
    pub fn seated_players(&self) -> Vec<&Player> {
        self.seats
            .iter()
            .flatten()
            .filter_map(|id| self.players.get(id))
            .collect()
    }
    /// Seated players who take part in hands (not sitting out), seat order.
    pub fn dealt_players(&self) -> Vec<&Player> {
        self.seated_players()
            .into_iter()
            .filter(|p| p.status != PlayerStatus::SittingOut)
            .collect()
    }
    /// First dealt seat strictly after `from`, wrapping around the table.
    pub(crate) fn next_dealt_seat(&self, from: Position) -> Option<Position> {
        (1..=SEATS)
            .map(|i| (from + i) % SEATS)
            .find(|&seat| {
                self.seated_at(seat)
                    .map(|p| p.status != PlayerStatus::SittingOut)
                    .unwrap_or(false)
            })
    }
    /// True while the player is dealt into the hand in progress.
    pub fn is_mid_hand(&self, id: &ID<Player>) -> bool {
        self.hand.as_ref().map(|h| h.contains(id)).unwrap_or(false)
    }
    /// Non-folded participants of the current hand, seat order.
    pub(crate) fn contesting(&self) -> Vec<&Player> {
        let hand = match &self.hand {
            Some(h) => h,
            None => return Vec::new(),
        };
        self.seats
            .iter()
            .flatten()
            .filter(|id| hand.contains(id))
            .filter_map(|id| self.players.get(id))
            .filter(|p| p.is_contesting())
            .collect()
    }
}

/// Readiness gates.
impl Room {
    /// Rebuy is permitted exactly when the gate blocks readying up.
    pub fn rebuy_available(&self, player: &Player) -> bool {
        if self.rebuy_minimum == 0 {
            player.chips == 0
        } else {
            player.chips <= self.rebuy_minimum
        }
    }
    /// Forced cashout above the table cap.
    pub fn cashout_required(&self, player: &Player) -> bool {
        self.max_chips > 0 && player.chips > self.max_chips
    }
    /// All conditions to deal the next hand.
    pub fn can_start(&self) -> bool {
        if self.status != RoomStatus::Waiting {
            return false;
        }
        let dealt = self.dealt_players();
        dealt.len() >= 2
            && dealt.iter().all(|p| p.ready)
            && dealt.iter().all(|p| !self.rebuy_available(p))
            && dealt.iter().all(|p| !self.cashout_required(p))
    }
}

/// Connectivity bookkeeping (session infrastructure, not a game rule).
impl Room {
    /// Flips a player's connected flag; returns whether anything changed.
    pub fn set_connected(&mut self, id: &ID<Player>, connected: bool) -> bool {
        match self.players.get_mut(id) {
            Some(p) if p.is_connected != connected => {
                p.is_connected = connected;
                true
            }
            _ => false,
        }
    }
}

impl Unique for Room {
    fn id(&self) -> ID<Self> {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn config() -> RoomConfig {
        RoomConfig {
            sb_amount: 10,
            initial_chips: 1000,
            rebuy_minimum: 0,
            max_chips: 0,
            hand_interval: 0,
        }
    }
    #[test]
    fn config_validation() {
        assert!(config().validate().is_ok());
        let mut bad = config();
        bad.sb_amount = 0;
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));
        let mut bad = config();
        bad.initial_chips = 30;
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));
        let mut bad = config();
        bad.max_chips = 500;
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));
    }
    #[test]
    fn new_room_shape() {
        let room = Room::new(ID::from("R1"), ID::from("owner"), config());
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.bb_amount, 20);
        assert_eq!(room.seats.len(), SEATS);
        assert!(room.hand.is_none());
        assert_eq!(room.dealer_seat, NO_SEAT);
    }
    #[test]
    fn status_wire_spelling() {
        assert_eq!(serde_json::to_string(&RoomStatus::Waiting).unwrap(), "\"waiting\"");
        assert_eq!(serde_json::to_string(&RoomStatus::Playing).unwrap(), "\"playing\"");
    }
}
