//! End-to-end engine scenarios driven exclusively through [`Room::apply`],
//! with structural invariants asserted after every transition.

use rack_core::*;
use rack_engine::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

fn pid(s: &str) -> ID<Player> {
    ID::from(s)
}

fn config(sb: Chips, initial: Chips) -> RoomConfig {
    RoomConfig {
        sb_amount: sb,
        initial_chips: initial,
        rebuy_minimum: 0,
        max_chips: 0,
        hand_interval: 0,
    }
}

/// A waiting room with players seated from seat 0, stacks as given.
fn table(cfg: RoomConfig, players: &[(&str, Chips)]) -> Room {
    let mut room = Room::new(ID::from("SCENARIO"), pid(players[0].0), cfg);
    for (i, (name, chips)) in players.iter().enumerate() {
        room = apply(
            &room,
            name,
            Command::Join {
                name: name.to_string(),
                emoji: "🃏".to_string(),
            },
        );
        room = apply(&room, name, Command::Sit { seat: i as i32 });
        room.players.get_mut(&pid(name)).unwrap().chips = *chips;
    }
    room
}

/// Applies a command, asserting success and all structural invariants.
fn apply(room: &Room, who: &str, command: Command) -> Room {
    let (next, _) = room
        .apply(&pid(who), command.clone())
        .unwrap_or_else(|e| panic!("{}: {} rejected: {}", who, command, e));
    assert_invariants(&next);
    next
}

fn apply_events(room: &Room, who: &str, command: Command) -> (Room, Vec<GameEvent>) {
    let (next, events) = room
        .apply(&pid(who), command.clone())
        .unwrap_or_else(|e| panic!("{}: {} rejected: {}", who, command, e));
    assert_invariants(&next);
    (next, events)
}

fn ready(room: &Room, who: &str) -> Room {
    apply(room, who, Command::Ready { ready: true })
}

fn act(room: &Room, who: &str, kind: ActionKind, amount: Option<Chips>) -> Room {
    apply(room, who, Command::Action { kind, amount })
}

fn winners(pairs: &[(&str, &[&str])]) -> BTreeMap<String, BTreeSet<ID<Player>>> {
    pairs
        .iter()
        .map(|(pot, who)| (pot.to_string(), who.iter().map(|w| pid(w)).collect()))
        .collect()
}

fn total_chips(room: &Room) -> Chips {
    room.players.values().map(|p| p.chips).sum()
}

/// The structural invariants every reachable snapshot satisfies.
fn assert_invariants(room: &Room) {
    for (seat, id) in room.seats.iter().enumerate() {
        if let Some(id) = id {
            assert_eq!(room.players[id].seat, seat as i32, "seat table points back");
        }
    }
    for p in room.players.values() {
        assert!(p.chips >= 0, "chips never go negative");
        if let Some(seat) = p.position() {
            assert_eq!(room.seats[seat], Some(p.player_id.clone()), "seated both ways");
        }
    }
    assert_eq!(
        room.status == RoomStatus::Playing,
        room.hand.is_some(),
        "playing exactly while a hand exists"
    );
    let hand = match &room.hand {
        Some(hand) => hand,
        None => return,
    };
    let contributed: Chips = room.players.values().map(|p| p.total_bet_this_hand).sum();
    assert_eq!(hand.pot, contributed, "pot mirrors contributions");
    if !hand.pots.is_empty() {
        let total: Chips = hand.pots.iter().map(|p| p.amount).sum();
        assert_eq!(total, hand.pot, "side pots sum to the pot");
        for pair in hand.pots.windows(2) {
            assert!(
                pair[0].eligible_players.is_superset(&pair[1].eligible_players),
                "higher pots shrink eligibility"
            );
        }
    }
    let max_bet = room
        .players
        .values()
        .filter(|p| p.is_contesting())
        .map(|p| p.current_bet)
        .max()
        .unwrap_or(0);
    assert!(hand.current_bet >= max_bet, "table bet covers every bet");
    if max_bet >= room.bb_amount {
        assert_eq!(hand.current_bet, max_bet, "table bet equals the highest bet");
    }
    match hand.phase {
        phase if phase.is_betting() => {
            assert!(hand.current_player_id.is_some(), "betting streets have a turn")
        }
        Phase::Showdown => {
            assert!(hand.current_player_id.is_none(), "no turn during settlement")
        }
        _ => {}
    }
    if hand.settlement_proposal.is_some() {
        assert_eq!(hand.phase, Phase::Showdown, "proposals only at showdown");
    }
}

// Scenario 1: heads-up blinds, limp, check, flop.
#[test]
fn heads_up_limped_pot_reaches_the_flop() {
    let mut room = table(config(10, 1000), &[("sb", 1000), ("bb", 1000)]);
    room = ready(&room, "sb");
    room = ready(&room, "bb");
    let hand = room.hand.as_ref().unwrap();
    assert_eq!(hand.phase, Phase::Preflop);
    assert_eq!(hand.dealer_seat, hand.sb_seat);
    assert_eq!(hand.current_bet, 20);
    assert_eq!(hand.current_player_id, Some(pid("sb")));
    room = act(&room, "sb", ActionKind::Call, None);
    room = act(&room, "bb", ActionKind::Check, None);
    let hand = room.hand.as_ref().unwrap();
    assert_eq!(hand.phase, Phase::Flop);
    assert_eq!(hand.pot, 40);
    assert_eq!(hand.current_bet, 0);
}

// Scenario 2: three-way all-in cascade and consensus settlement.
#[test]
fn all_in_cascade_settles_by_consensus() {
    let mut room = table(config(10, 1000), &[("p1", 100), ("p2", 200), ("p3", 1000)]);
    let bank = total_chips(&room);
    room = ready(&room, "p1");
    room = ready(&room, "p2");
    room = ready(&room, "p3");
    room = act(&room, "p1", ActionKind::AllIn, None);
    room = act(&room, "p2", ActionKind::AllIn, None);
    room = act(&room, "p3", ActionKind::Call, None);
    let hand = room.hand.as_ref().unwrap();
    assert_eq!(hand.phase, Phase::Showdown);
    assert_eq!(hand.pots.len(), 2);
    assert_eq!(hand.pots[0].amount, 300);
    assert_eq!(
        hand.pots[0].eligible_players,
        BTreeSet::from([pid("p1"), pid("p2"), pid("p3")])
    );
    assert_eq!(hand.pots[1].amount, 200);
    assert_eq!(
        hand.pots[1].eligible_players,
        BTreeSet::from([pid("p2"), pid("p3")])
    );
    room = apply(
        &room,
        "p3",
        Command::Propose {
            pot_winners: winners(&[("pot-0", &["p3"]), ("pot-1", &["p3"])]),
        },
    );
    room = apply(&room, "p1", Command::Confirm);
    room = apply(&room, "p2", Command::Confirm);
    assert_eq!(room.status, RoomStatus::Waiting);
    assert_eq!(room.players[&pid("p3")].chips, 1300);
    assert_eq!(room.players[&pid("p1")].chips, 0);
    assert_eq!(room.players[&pid("p2")].chips, 0);
    assert_eq!(total_chips(&room), bank, "chips conserved across the hand");
}

// Scenario 3: three folds hand the blinds to the big blind, no showdown.
#[test]
fn fold_out_awards_single_winner() {
    let mut room = table(
        config(10, 1000),
        &[("a", 1000), ("b", 1000), ("c", 1000), ("d", 1000)],
    );
    for name in ["a", "b", "c", "d"] {
        room = ready(&room, name);
    }
    // Dealer a, small blind b, big blind c, d under the gun.
    room = act(&room, "d", ActionKind::Fold, None);
    room = act(&room, "a", ActionKind::Fold, None);
    let (room, events) = apply_events(
        &room,
        "b",
        Command::Action {
            kind: ActionKind::Fold,
            amount: None,
        },
    );
    assert!(room.hand.is_none());
    let winner_event = events
        .iter()
        .find_map(|e| match e {
            GameEvent::SingleWinner { winner, pot, .. } => Some((winner.clone(), *pot)),
            _ => None,
        })
        .expect("single winner emitted");
    assert_eq!(winner_event, (pid("c"), 30));
    assert_eq!(room.players[&pid("c")].chips, 1010);
}

// Scenario 4: reject, re-propose, and split with the remainder rotating.
#[test]
fn rejected_proposal_is_replaced_and_split() {
    let mut room = table(config(10, 1000), &[("a", 1000), ("b", 1000)]);
    room = ready(&room, "a");
    room = ready(&room, "b");
    room = act(&room, "a", ActionKind::Call, None);
    room = act(&room, "b", ActionKind::Check, None);
    for _ in 0..3 {
        room = act(&room, "b", ActionKind::Check, None);
        room = act(&room, "a", ActionKind::Check, None);
    }
    assert_eq!(room.hand.as_ref().unwrap().phase, Phase::Showdown);
    room = apply(
        &room,
        "a",
        Command::Propose {
            pot_winners: winners(&[("pot-0", &["a"])]),
        },
    );
    room = apply(&room, "b", Command::Reject);
    assert!(room.hand.as_ref().unwrap().settlement_proposal.is_none());
    room = apply(
        &room,
        "a",
        Command::Propose {
            pot_winners: winners(&[("pot-0", &["a", "b"])]),
        },
    );
    room = apply(&room, "b", Command::Confirm);
    assert_eq!(room.status, RoomStatus::Waiting);
    assert_eq!(room.players[&pid("a")].chips, 1000);
    assert_eq!(room.players[&pid("b")].chips, 1000);
}

// Scenario 5: the rebuy gate blocks ready until the rebuy lands.
#[test]
fn rebuy_gate_blocks_then_clears() {
    let mut room = table(
        RoomConfig {
            sb_amount: 10,
            initial_chips: 500,
            rebuy_minimum: 100,
            max_chips: 0,
            hand_interval: 0,
        },
        &[("short", 80), ("deep", 1000)],
    );
    let denied = room.apply(&pid("short"), Command::Ready { ready: true });
    assert_eq!(denied.unwrap_err(), EngineError::MustRebuy);
    room = apply(&room, "short", Command::Rebuy);
    let p = &room.players[&pid("short")];
    assert_eq!(p.chips, 580);
    assert_eq!(p.total_rebuys, 1);
    room = ready(&room, "short");
    assert!(room.players[&pid("short")].ready);
}

// Scenario 6: persist mid-flop, restore, and play on identically.
#[test]
fn snapshot_roundtrip_mid_hand_is_transparent() {
    let mut room = table(config(10, 1000), &[("a", 1000), ("b", 1000)]);
    room = ready(&room, "a");
    room = ready(&room, "b");
    room = act(&room, "a", ActionKind::Call, None);
    room = act(&room, "b", ActionKind::Check, None);
    assert_eq!(room.hand.as_ref().unwrap().phase, Phase::Flop);

    let blob = serde_json::to_vec(&room).unwrap();
    let restored: Room = serde_json::from_slice(&blob).unwrap();
    assert_eq!(
        restored.hand.as_ref().unwrap().current_player_id,
        room.hand.as_ref().unwrap().current_player_id
    );
    // The same action produces the same state on both copies.
    let a = act(&room, "b", ActionKind::Raise, Some(40));
    let b = act(&restored, "b", ActionKind::Raise, Some(40));
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

// Replaying the full command log on a fresh room reaches the same state.
#[test]
fn replay_is_deterministic() {
    let script: Vec<(&str, Command)> = vec![
        ("a", Command::Ready { ready: true }),
        ("b", Command::Ready { ready: true }),
        ("c", Command::Ready { ready: true }),
        (
            "a",
            Command::Action {
                kind: ActionKind::Call,
                amount: None,
            },
        ),
        (
            "b",
            Command::Action {
                kind: ActionKind::Raise,
                amount: Some(60),
            },
        ),
        (
            "c",
            Command::Action {
                kind: ActionKind::Fold,
                amount: None,
            },
        ),
        (
            "a",
            Command::Action {
                kind: ActionKind::Call,
                amount: None,
            },
        ),
    ];
    let run = |mut room: Room| {
        for (who, command) in &script {
            room = apply(&room, who, command.clone());
        }
        room
    };
    let first = run(table(config(10, 1000), &[("a", 1000), ("b", 1000), ("c", 1000)]));
    let second = run(table(config(10, 1000), &[("a", 1000), ("b", 1000), ("c", 1000)]));
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(first.hand.as_ref().unwrap().phase, Phase::Flop);
}

// Cashout repeats in buy-in quanta until at or under the cap.
#[test]
fn cashout_repeats_by_buyin_quanta() {
    let mut room = table(
        RoomConfig {
            sb_amount: 10,
            initial_chips: 1000,
            rebuy_minimum: 0,
            max_chips: 2500,
            hand_interval: 0,
        },
        &[("big", 4600), ("other", 1000)],
    );
    room = apply(&room, "big", Command::Cashout);
    assert_eq!(room.players[&pid("big")].chips, 3600);
    room = apply(&room, "big", Command::Cashout);
    assert_eq!(room.players[&pid("big")].chips, 2600);
    room = apply(&room, "big", Command::Cashout);
    assert_eq!(room.players[&pid("big")].chips, 1600);
    assert_eq!(room.players[&pid("big")].total_cashouts, 3);
    assert!(room.apply(&pid("big"), Command::Cashout).is_err());
}

// Standings from a full session sum to zero, counting rebuys and cashouts.
#[test]
fn game_ended_standings_are_zero_sum() {
    let mut room = table(
        RoomConfig {
            sb_amount: 10,
            initial_chips: 1000,
            rebuy_minimum: 0,
            max_chips: 3000,
            hand_interval: 0,
        },
        &[("a", 1000), ("b", 1000), ("c", 1000)],
    );
    // A short session: a wins b's stack outright.
    room = ready(&room, "a");
    room = ready(&room, "b");
    room = ready(&room, "c");
    room = act(&room, "a", ActionKind::AllIn, None);
    room = act(&room, "b", ActionKind::AllIn, None);
    room = act(&room, "c", ActionKind::Fold, None);
    room = apply(
        &room,
        "a",
        Command::Propose {
            pot_winners: winners(&[("pot-0", &["a"])]),
        },
    );
    room = apply(&room, "b", Command::Confirm);
    // b rebuys, then the owner calls the game.
    room = apply(&room, "b", Command::Rebuy);
    let (room, events) = apply_events(&room, "a", Command::EndGame);
    assert_eq!(room.status, RoomStatus::Finished);
    let standings = events
        .iter()
        .find_map(|e| match e {
            GameEvent::GameEnded { standings } => Some(standings.clone()),
            _ => None,
        })
        .expect("standings emitted");
    assert_eq!(standings.iter().map(|s| s.net).sum::<Chips>(), 0);
}
