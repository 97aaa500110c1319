use super::*;
use rack_core::*;

/// Hand lifecycle: dealing in, street boundaries, and teardown.
impl Room {
    /// Deals a new hand once every seated player is ready.
    ///
    /// The button advances to the next dealt seat (lowest seat on the very
    /// first hand). Heads-up the dealer posts the small blind. A player who
    /// cannot cover a blind posts what they have and is all-in; the table
    /// bet is the full big blind either way.
    pub(crate) fn start_hand(&mut self, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
        if !self.can_start() {
            return Err(EngineError::IllegalAction("table is not ready".into()));
        }
        let dealt = self.dealt_players();
        let lowest = dealt[0].position().expect("dealt players are seated");
        let dealer = match self.dealer_seat {
            s if s < 0 => lowest,
            s => self
                .next_dealt_seat(s as Position)
                .expect("two dealt players"),
        };
        let heads_up = dealt.len() == 2;
        let sb_seat = if heads_up {
            dealer
        } else {
            self.next_dealt_seat(dealer).expect("two dealt players")
        };
        let bb_seat = self.next_dealt_seat(sb_seat).expect("two dealt players");
        let order: Vec<ID<Player>> = dealt.iter().map(|p| p.player_id.clone()).collect();
        for id in &order {
            if let Some(p) = self.players.get_mut(id) {
                p.reset_hand();
            }
        }
        let sb_id = self.seats[sb_seat].clone().expect("sb seat occupied");
        let bb_id = self.seats[bb_seat].clone().expect("bb seat occupied");
        let sb_amount = self.sb_amount;
        let bb_amount = self.bb_amount;
        self.post_blind(&sb_id, sb_amount, "SB");
        self.post_blind(&bb_id, bb_amount, "BB");

        let mut hand = HandState::new(dealer, sb_seat, bb_seat);
        hand.pot = order
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| p.total_bet_this_hand)
            .sum();
        hand.current_bet = bb_amount;
        hand.last_raiser_id = Some(bb_id.clone());
        hand.phase = Phase::Preflop;
        // First to act sits immediately after the big blind; heads-up
        // preflop that wraps around to the dealer/small blind.
        let first_seat = self.next_dealt_seat(bb_seat).expect("two dealt players");
        let first_id = self.seats[first_seat].clone().expect("first seat occupied");
        let rotation = order
            .iter()
            .position(|id| *id == first_id)
            .expect("first actor is dealt");
        hand.action_order = order;
        hand.action_order.rotate_left(rotation);
        self.dealer_seat = dealer as i32;
        self.status = RoomStatus::Playing;
        self.hand = Some(hand);
        log::info!(
            "[room {}] hand dealt (button seat {}, blinds {}/{})",
            self.id,
            dealer,
            sb_amount,
            bb_amount
        );
        events.push(GameEvent::PhaseChange {
            phase: Phase::Preflop,
        });
        self.resolve_turn(0, events);
        Ok(())
    }

    fn post_blind(&mut self, id: &ID<Player>, amount: Chips, tag: &str) {
        if let Some(p) = self.players.get_mut(id) {
            let paid = amount.min(p.chips);
            p.stake(paid);
            p.last_action = Some(format!("{} {}", tag, paid));
        }
    }

    /// Closes the finished street and opens the next one.
    ///
    /// Bets sweep into the pot accounting, pots are rebuilt from scratch,
    /// and the first active player clockwise from the dealer acts next.
    /// When no two players can still bet, streets advance logically all the
    /// way to showdown so the physical table keeps dealing.
    pub(crate) fn advance_street(&mut self, events: &mut Vec<GameEvent>) {
        loop {
            let order = self.hand.as_ref().expect("hand in progress").action_order.clone();
            for id in &order {
                if let Some(p) = self.players.get_mut(id) {
                    p.current_bet = 0;
                    p.has_acted_this_street = false;
                }
            }
            let pots = pot::rebuild(self.players.values());
            let dealer = {
                let hand = self.hand.as_mut().expect("hand in progress");
                hand.current_bet = 0;
                hand.last_raiser_id = None;
                hand.current_player_id = None;
                hand.action_index = 0;
                hand.pots = pots;
                hand.phase = hand.phase.next();
                events.push(GameEvent::PhaseChange { phase: hand.phase });
                if hand.phase == Phase::Showdown {
                    return;
                }
                hand.dealer_seat
            };
            let actives = self
                .contesting()
                .iter()
                .filter(|p| p.status == PlayerStatus::Active)
                .count();
            if actives < 2 {
                continue;
            }
            let first = (1..=SEATS)
                .map(|i| (dealer + i) % SEATS)
                .find_map(|seat| {
                    self.seats[seat]
                        .clone()
                        .filter(|id| order.contains(id))
                        .filter(|id| {
                            self.players
                                .get(id)
                                .map(|p| p.status == PlayerStatus::Active)
                                .unwrap_or(false)
                        })
                })
                .expect("an active player remains");
            let hand = self.hand.as_mut().expect("hand in progress");
            let rotation = hand
                .action_order
                .iter()
                .position(|id| *id == first)
                .expect("first actor is dealt");
            hand.action_order.rotate_left(rotation);
            hand.action_index = 0;
            hand.current_player_id = Some(first);
            return;
        }
    }

    /// Everyone else folded: the last player standing takes the whole pot
    /// without showdown or consensus.
    pub(crate) fn award_uncontested(&mut self, events: &mut Vec<GameEvent>) {
        let pot = self.hand.as_ref().expect("hand in progress").pot;
        let winner = self
            .contesting()
            .first()
            .map(|p| p.player_id.clone())
            .expect("one player remains");
        let name = self
            .players
            .get(&winner)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        if let Some(p) = self.players.get_mut(&winner) {
            p.chips += pot;
        }
        log::info!("[room {}] {} wins {} uncontested", self.id, name, pot);
        events.push(GameEvent::PhaseChange {
            phase: Phase::HandEnd,
        });
        events.push(GameEvent::SingleWinner {
            winner,
            winner_name: name,
            pot,
        });
        self.finish_hand();
    }

    /// Tears the hand down and returns the room to the lobby.
    pub(crate) fn finish_hand(&mut self) {
        self.hand = None;
        self.status = RoomStatus::Waiting;
        self.hand_number += 1;
        for p in self.players.values_mut() {
            p.reset_hand();
        }
    }
}
