use super::*;
use rack_core::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Settlement consensus: winners are declared, not computed.
///
/// The server never sees cards, so a hand at showdown settles only when a
/// proposal naming the winners of every pot is confirmed by every
/// non-folded seated player. Any of them can reject and force a fresh
/// proposal instead.
impl Room {
    pub(crate) fn propose(
        &mut self,
        actor: &ID<Player>,
        pot_winners: BTreeMap<String, BTreeSet<ID<Player>>>,
    ) -> Result<(), EngineError> {
        self.check_settler(actor)?;
        let hand = self.hand.as_ref().expect("settler implies hand");
        if let Some(existing) = &hand.settlement_proposal {
            if existing.proposer_id != *actor {
                return Err(EngineError::Conflict("a proposal is already pending".into()));
            }
        }
        if pot_winners.len() != hand.pots.len() {
            return Err(EngineError::Validation("winners must cover every pot".into()));
        }
        for pot in &hand.pots {
            let winners = pot_winners
                .get(&pot.id)
                .ok_or_else(|| EngineError::Validation(format!("no winners for {}", pot.id)))?;
            if winners.is_empty() {
                return Err(EngineError::Validation(format!("{} has no winners", pot.id)));
            }
            if !winners.is_subset(&pot.eligible_players) {
                return Err(EngineError::Validation(format!(
                    "ineligible winner for {}",
                    pot.id
                )));
            }
        }
        let proposal = SettlementProposal {
            proposer_id: actor.clone(),
            pot_winners,
            confirmed_by: BTreeSet::from([actor.clone()]),
        };
        self.hand.as_mut().expect("settler implies hand").settlement_proposal = Some(proposal);
        Ok(())
    }

    pub(crate) fn confirm(
        &mut self,
        actor: &ID<Player>,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        self.check_settler(actor)?;
        let settlers = self.settlers();
        let ratified = {
            let hand = self.hand.as_mut().expect("settler implies hand");
            let proposal = hand
                .settlement_proposal
                .as_mut()
                .ok_or_else(|| EngineError::Conflict("nothing proposed yet".into()))?;
            proposal.confirmed_by.insert(actor.clone());
            proposal.confirmed_by == settlers
        };
        if ratified {
            self.ratify(events);
        }
        Ok(())
    }

    pub(crate) fn reject(&mut self, actor: &ID<Player>) -> Result<(), EngineError> {
        self.check_settler(actor)?;
        let hand = self.hand.as_mut().expect("settler implies hand");
        if hand.settlement_proposal.is_none() {
            return Err(EngineError::Conflict("nothing proposed yet".into()));
        }
        hand.settlement_proposal = None;
        Ok(())
    }

    /// Pays out the ratified proposal and closes the hand.
    ///
    /// Each winner takes `amount / n` per pot; the remainder chips go to
    /// the first winner clockwise from the dealer, which rotates with the
    /// button and so stays fair over a session.
    fn ratify(&mut self, events: &mut Vec<GameEvent>) {
        let hand = self.hand.clone().expect("ratify during showdown");
        let proposal = hand
            .settlement_proposal
            .expect("ratify with full confirmation");
        for pot in &hand.pots {
            let winners = &proposal.pot_winners[&pot.id];
            let n = winners.len() as Chips;
            let share = pot.amount / n;
            let remainder = pot.amount % n;
            for id in winners {
                if let Some(p) = self.players.get_mut(id) {
                    p.chips += share;
                }
            }
            if remainder > 0 {
                let lucky = (1..=SEATS)
                    .map(|i| (hand.dealer_seat + i) % SEATS)
                    .find_map(|seat| self.seats[seat].clone().filter(|id| winners.contains(id)))
                    .expect("winners are seated");
                if let Some(p) = self.players.get_mut(&lucky) {
                    p.chips += remainder;
                }
            }
        }
        log::info!("[room {}] hand {} settled", self.id, self.hand_number + 1);
        events.push(GameEvent::PhaseChange {
            phase: Phase::HandEnd,
        });
        self.finish_hand();
    }

    /// The players whose confirmation ratifies a settlement.
    pub(crate) fn settlers(&self) -> BTreeSet<ID<Player>> {
        self.contesting()
            .iter()
            .map(|p| p.player_id.clone())
            .collect()
    }

    fn check_settler(&self, actor: &ID<Player>) -> Result<(), EngineError> {
        let hand = self
            .hand
            .as_ref()
            .ok_or_else(|| EngineError::IllegalAction("no hand in progress".into()))?;
        if hand.phase != Phase::Showdown {
            return Err(EngineError::IllegalAction("settlement happens at showdown".into()));
        }
        let player = self.player(actor)?;
        if !player.is_seated() || !hand.contains(actor) || player.status == PlayerStatus::Folded {
            return Err(EngineError::IllegalAction(
                "only players in the hand settle it".into(),
            ));
        }
        Ok(())
    }
}

/// End of session.
impl Room {
    pub(crate) fn end_game(
        &mut self,
        actor: &ID<Player>,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        if *actor != self.owner_id {
            return Err(EngineError::IllegalAction("only the owner ends the game".into()));
        }
        if self.status != RoomStatus::Waiting {
            return Err(EngineError::IllegalAction("finish the hand first".into()));
        }
        self.status = RoomStatus::Finished;
        let standings = self.standings();
        log::info!("[room {}] game ended by owner", self.id);
        events.push(GameEvent::GameEnded { standings });
        Ok(())
    }

    /// Net profit/loss per player: stack plus cashed-out buy-ins, minus
    /// bought-in chips (initial buy-in and rebuys). Sums to zero.
    pub fn standings(&self) -> Vec<Standing> {
        let initial = self.initial_chips;
        let mut standings: Vec<Standing> = self
            .players
            .values()
            .map(|p| Standing {
                player_id: p.player_id.clone(),
                name: p.name.clone(),
                chips: p.chips,
                total_rebuys: p.total_rebuys,
                total_cashouts: p.total_cashouts,
                net: p.chips + p.total_cashouts as Chips * initial
                    - p.total_rebuys as Chips * initial
                    - initial,
            })
            .collect();
        standings.sort_by(|a, b| b.net.cmp(&a.net));
        standings
    }
}
