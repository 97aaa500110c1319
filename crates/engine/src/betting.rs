use super::*;
use rack_core::*;

/// The betting-turn sequencer.
///
/// Reopening is encoded entirely in `has_acted_this_street`: a full raise
/// clears everyone else's flag so they act again with all options; a short
/// all-in leaves flags alone, so players who already acted may only call
/// the larger amount or fold.
impl Room {
    pub(crate) fn action(
        &mut self,
        actor: &ID<Player>,
        kind: ActionKind,
        amount: Option<Chips>,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), EngineError> {
        let bb = self.bb_amount;
        let (table_bet, from) = match &self.hand {
            Some(hand) => {
                if !hand.phase.is_betting() {
                    return Err(EngineError::IllegalAction("betting is closed".into()));
                }
                if hand.current_player_id.as_ref() != Some(actor) {
                    return Err(EngineError::NotYourTurn);
                }
                (
                    hand.current_bet,
                    (hand.action_index + 1) % hand.action_order.len(),
                )
            }
            None => return Err(EngineError::IllegalAction("no hand in progress".into())),
        };
        let (p_bet, p_chips, p_acted) = {
            let p = self.player(actor)?;
            (p.current_bet, p.chips, p.has_acted_this_street)
        };

        let mut pay = 0;
        let mut new_table = table_bet;
        let mut reopens = false;
        let tag = match kind {
            ActionKind::Fold => "fold".to_string(),
            ActionKind::Check => {
                if p_bet != table_bet {
                    return Err(EngineError::IllegalAction("cannot check a live bet".into()));
                }
                "check".to_string()
            }
            ActionKind::Call => {
                if table_bet <= p_bet {
                    return Err(EngineError::IllegalAction("nothing to call".into()));
                }
                pay = (table_bet - p_bet).min(p_chips);
                format!("call {}", pay)
            }
            ActionKind::Raise => {
                let to = amount
                    .ok_or_else(|| EngineError::Validation("raise needs an amount".into()))?;
                if p_acted {
                    return Err(EngineError::IllegalAction("raising is closed".into()));
                }
                if to < table_bet + bb {
                    return Err(EngineError::IllegalAction(format!(
                        "raise must reach at least {}",
                        table_bet + bb
                    )));
                }
                if to > p_chips + p_bet {
                    return Err(EngineError::IllegalAction("raise exceeds stack".into()));
                }
                pay = to - p_bet;
                new_table = to;
                reopens = true;
                format!("raise {}", to)
            }
            ActionKind::AllIn => {
                if p_chips == 0 {
                    return Err(EngineError::IllegalAction("no chips to bet".into()));
                }
                let to = p_bet + p_chips;
                pay = p_chips;
                if to >= table_bet + bb {
                    new_table = to;
                    reopens = true;
                } else {
                    // Short all-in: raises the bet for matching purposes
                    // only. Players who already acted cannot re-raise.
                    new_table = table_bet.max(to);
                }
                format!("all-in {}", to)
            }
        };

        {
            let player = self.players.get_mut(actor).expect("actor exists");
            if kind == ActionKind::Fold {
                player.status = PlayerStatus::Folded;
            }
            if pay > 0 {
                player.stake(pay);
            }
            player.has_acted_this_street = true;
            player.last_action = Some(tag);
        }
        let order = {
            let hand = self.hand.as_mut().expect("hand in progress");
            hand.pot += pay;
            hand.current_bet = new_table;
            if reopens {
                hand.last_raiser_id = Some(actor.clone());
            }
            hand.action_order.clone()
        };
        if reopens {
            for id in &order {
                if id == actor {
                    continue;
                }
                if let Some(p) = self.players.get_mut(id) {
                    if p.status == PlayerStatus::Active {
                        p.has_acted_this_street = false;
                    }
                }
            }
        }
        self.resolve_turn(from, events);
        Ok(())
    }

    /// Still owes a decision this street.
    fn needs_action(&self, player: &Player) -> bool {
        let table_bet = match &self.hand {
            Some(h) => h.current_bet,
            None => return false,
        };
        player.status == PlayerStatus::Active
            && (!player.has_acted_this_street || player.current_bet != table_bet)
    }

    /// Every non-folded non-all-in player has acted and matched the bet.
    fn street_settled(&self) -> bool {
        let table_bet = match &self.hand {
            Some(h) => h.current_bet,
            None => return true,
        };
        self.contesting()
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .all(|p| p.has_acted_this_street && p.current_bet == table_bet)
    }

    /// Hands the turn to the next player owing a decision, starting the
    /// cyclic scan at `from`; otherwise closes the street or the hand.
    pub(crate) fn resolve_turn(&mut self, from: usize, events: &mut Vec<GameEvent>) {
        if self.contesting().len() <= 1 {
            self.award_uncontested(events);
            return;
        }
        if self.street_settled() {
            self.advance_street(events);
            return;
        }
        let (next, order_len) = {
            let hand = self.hand.as_ref().expect("hand in progress");
            let n = hand.action_order.len();
            let next = (0..n).map(|i| (from + i) % n).find(|&i| {
                self.players
                    .get(&hand.action_order[i])
                    .map(|p| self.needs_action(p))
                    .unwrap_or(false)
            });
            (next, n)
        };
        debug_assert!(order_len > 0);
        match next {
            Some(index) => {
                let hand = self.hand.as_mut().expect("hand in progress");
                let id = hand.action_order[index].clone();
                hand.action_index = index;
                hand.current_player_id = Some(id);
            }
            None => self.advance_street(events),
        }
    }
}
