use super::*;
use rack_core::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;

/// A pot and the players entitled to win it.
///
/// Ids are deterministic (`pot-0`, `pot-1`, ...) in ascending contribution
/// level so settlement references survive rebuilds within a hand. `pot-0`
/// is the main pot every contesting contributor is eligible for; later
/// entries are side pots with shrinking eligible sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    pub id: String,
    pub amount: Chips,
    pub eligible_players: BTreeSet<ID<Player>>,
}

/// Rebuilds all pots from per-hand contributions.
///
/// Stratifies `total_bet_this_hand` at the distinct contribution levels,
/// lowest first. Folded chips are counted into the strata but folded
/// players are never eligible. Adjacent strata with identical eligible
/// sets merge for display compactness.
///
/// Pots are always recomputed from scratch at street boundaries; they are
/// never incrementally mutated mid-street.
pub fn rebuild<'p>(players: impl Iterator<Item = &'p Player>) -> Vec<Pot> {
    let contributors: Vec<&Player> = players.filter(|p| p.total_bet_this_hand > 0).collect();
    let mut levels: Vec<Chips> = contributors.iter().map(|p| p.total_bet_this_hand).collect();
    levels.sort_unstable();
    levels.dedup();
    let mut pots: Vec<Pot> = Vec::new();
    let mut floor = 0;
    for level in levels {
        let amount = (level - floor)
            * contributors
                .iter()
                .filter(|p| p.total_bet_this_hand >= level)
                .count() as Chips;
        let eligible: BTreeSet<ID<Player>> = contributors
            .iter()
            .filter(|p| p.total_bet_this_hand >= level)
            .filter(|p| p.status != PlayerStatus::Folded)
            .map(|p| p.player_id.clone())
            .collect();
        match pots.last_mut() {
            Some(last) if last.eligible_players == eligible => last.amount += amount,
            _ => pots.push(Pot {
                id: format!("pot-{}", pots.len()),
                amount,
                eligible_players: eligible,
            }),
        }
        floor = level;
    }
    pots
}
