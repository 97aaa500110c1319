use super::*;
use rack_core::*;

/// Seating, readiness, and the buy-in lifecycle. Everything here runs
/// between hands; mid-hand the betting module owns the table.
impl Room {
    pub(crate) fn join(
        &mut self,
        actor: &ID<Player>,
        name: String,
        emoji: String,
    ) -> Result<(), EngineError> {
        if self.status == RoomStatus::Finished {
            return Err(EngineError::Conflict("game is over".into()));
        }
        if self.players.contains_key(actor) {
            return Ok(());
        }
        let player = Player::new(actor.clone(), name, emoji, self.initial_chips);
        self.players.insert(actor.clone(), player);
        Ok(())
    }

    pub(crate) fn sit(&mut self, actor: &ID<Player>, seat: i32) -> Result<(), EngineError> {
        if self.status == RoomStatus::Finished {
            return Err(EngineError::Conflict("game is over".into()));
        }
        if seat < 0 || seat as usize >= SEATS {
            return Err(EngineError::Validation(format!("no such seat {}", seat)));
        }
        if self.player(actor)?.seat == seat {
            return Ok(());
        }
        if self.player(actor)?.is_seated() {
            return Err(EngineError::Conflict("already seated".into()));
        }
        if self.seats.iter().all(|s| s.is_some()) {
            return Err(EngineError::Conflict("room is full".into()));
        }
        let index = seat as Position;
        if self.seats[index].is_some() {
            return Err(EngineError::Conflict(format!("seat {} taken", seat)));
        }
        self.seats[index] = Some(actor.clone());
        let player = self.player_mut(actor)?;
        player.seat = seat;
        player.ready = false;
        Ok(())
    }

    pub(crate) fn stand(&mut self, actor: &ID<Player>) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::IllegalAction("cannot stand mid-game".into()));
        }
        let player = self.player_mut(actor)?;
        let seat = match player.position() {
            Some(seat) => seat,
            None => return Err(EngineError::IllegalAction("not seated".into())),
        };
        player.seat = NO_SEAT;
        player.ready = false;
        player.reset_hand();
        self.seats[seat] = None;
        Ok(())
    }

    pub(crate) fn set_ready(
        &mut self,
        actor: &ID<Player>,
        ready: bool,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::IllegalAction("hand already in progress".into()));
        }
        let player = self.player(actor)?;
        if !player.is_seated() {
            return Err(EngineError::IllegalAction("sit down first".into()));
        }
        if ready && self.rebuy_available(player) {
            return Err(EngineError::MustRebuy);
        }
        if ready && self.cashout_required(player) {
            return Err(EngineError::MustCashout);
        }
        self.player_mut(actor)?.ready = ready;
        if ready && self.can_start() {
            self.start_hand(events)?;
        }
        Ok(())
    }

    pub(crate) fn rebuy(&mut self, actor: &ID<Player>) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::IllegalAction("rebuy only between hands".into()));
        }
        let player = self.player(actor)?;
        if !self.rebuy_available(player) {
            return Err(EngineError::IllegalAction("stack too large to rebuy".into()));
        }
        let initial = self.initial_chips;
        let player = self.player_mut(actor)?;
        player.chips += initial;
        player.total_rebuys += 1;
        Ok(())
    }

    pub(crate) fn cashout(&mut self, actor: &ID<Player>) -> Result<(), EngineError> {
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::IllegalAction("cashout only between hands".into()));
        }
        let player = self.player(actor)?;
        if !self.cashout_required(player) {
            return Err(EngineError::IllegalAction("stack is under the table cap".into()));
        }
        let initial = self.initial_chips;
        let player = self.player_mut(actor)?;
        player.chips -= initial;
        player.total_cashouts += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self, actor: &ID<Player>) -> Result<(), EngineError> {
        if self.is_mid_hand(actor) {
            return Err(EngineError::IllegalAction("cannot leave mid-hand".into()));
        }
        let player = self.player(actor)?;
        if let Some(seat) = player.position() {
            self.seats[seat] = None;
        }
        self.players.remove(actor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;

    #[test]
    fn sit_assigns_and_clears_ready() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        room.player_mut(&pid("a")).unwrap().ready = true;
        room.stand(&pid("a")).unwrap();
        room.sit(&pid("a"), 4).unwrap();
        let p = room.player(&pid("a")).unwrap();
        assert_eq!(p.seat, 4);
        assert!(!p.ready);
        assert_eq!(room.seats[4], Some(pid("a")));
    }

    #[test]
    fn sit_conflicts() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        assert!(matches!(
            room.sit(&pid("a"), 5),
            Err(EngineError::Conflict(_)) // already seated
        ));
        room.stand(&pid("a")).unwrap();
        assert!(matches!(
            room.sit(&pid("a"), 1),
            Err(EngineError::Conflict(_)) // b holds seat 1
        ));
        assert!(matches!(
            room.sit(&pid("a"), 42),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn duplicate_sit_is_a_noop() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        room.stand(&pid("a")).unwrap();
        room.sit(&pid("a"), 3).unwrap();
        // Same seat again: no-op. A different seat is still a conflict.
        assert!(room.sit(&pid("a"), 3).is_ok());
        assert!(room.sit(&pid("a"), 4).is_err());
        assert_eq!(room.seats[3], Some(pid("a")));
    }

    #[test]
    fn stand_frees_seat_only_while_waiting() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        room.stand(&pid("b")).unwrap();
        assert_eq!(room.seats[1], None);
        assert!(!room.player(&pid("b")).unwrap().is_seated());
    }

    #[test]
    fn ready_gate_requires_rebuy_at_zero() {
        let mut room = lobby_of(&[("a", 0), ("b", 1000)]);
        let mut events = Vec::new();
        assert_eq!(
            room.set_ready(&pid("a"), true, &mut events),
            Err(EngineError::MustRebuy)
        );
        room.rebuy(&pid("a")).unwrap();
        let p = room.player(&pid("a")).unwrap();
        assert_eq!(p.chips, room.initial_chips);
        assert_eq!(p.total_rebuys, 1);
        room.set_ready(&pid("a"), true, &mut events).unwrap();
        assert!(room.player(&pid("a")).unwrap().ready);
    }

    #[test]
    fn ready_gate_with_rebuy_minimum() {
        // rebuy_minimum=100, initial=500: 80 chips is blocked, rebuy
        // lands at 580 and readying succeeds.
        let mut room = lobby_with(
            &[("a", 80), ("b", 1000)],
            RoomConfig {
                sb_amount: 10,
                initial_chips: 500,
                rebuy_minimum: 100,
                max_chips: 0,
                hand_interval: 0,
            },
        );
        let mut events = Vec::new();
        assert_eq!(
            room.set_ready(&pid("a"), true, &mut events),
            Err(EngineError::MustRebuy)
        );
        room.rebuy(&pid("a")).unwrap();
        assert_eq!(room.player(&pid("a")).unwrap().chips, 580);
        assert_eq!(room.player(&pid("a")).unwrap().total_rebuys, 1);
        assert!(room.set_ready(&pid("a"), true, &mut events).is_ok());
    }

    #[test]
    fn cashout_gate_above_table_cap() {
        let mut room = lobby_with(
            &[("a", 2600), ("b", 1000)],
            RoomConfig {
                sb_amount: 10,
                initial_chips: 1000,
                rebuy_minimum: 0,
                max_chips: 2000,
                hand_interval: 0,
            },
        );
        let mut events = Vec::new();
        assert_eq!(
            room.set_ready(&pid("a"), true, &mut events),
            Err(EngineError::MustCashout)
        );
        room.cashout(&pid("a")).unwrap();
        let p = room.player(&pid("a")).unwrap();
        assert_eq!(p.chips, 1600);
        assert_eq!(p.total_cashouts, 1);
        assert!(room.set_ready(&pid("a"), true, &mut events).is_ok());
        // Repeat invocations stop once at or under the cap.
        assert!(room.cashout(&pid("a")).is_err());
    }

    #[test]
    fn rebuy_rejected_when_stack_is_live() {
        let mut room = lobby_of(&[("a", 500), ("b", 1000)]);
        assert!(matches!(
            room.rebuy(&pid("a")),
            Err(EngineError::IllegalAction(_))
        ));
    }

    #[test]
    fn leave_frees_seat_and_forgets_player() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        room.leave(&pid("b")).unwrap();
        assert_eq!(room.seats[1], None);
        assert!(room.player(&pid("b")).is_err());
    }

    #[test]
    fn join_is_idempotent() {
        let mut room = lobby_of(&[("a", 1000), ("b", 1000)]);
        let before = room.player(&pid("a")).unwrap().chips;
        room.join(&pid("a"), "other".into(), "🎲".into()).unwrap();
        let after = room.player(&pid("a")).unwrap();
        assert_eq!(after.chips, before);
        assert_eq!(after.name, "a");
    }
}
