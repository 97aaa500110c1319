use super::*;
use rack_core::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A betting decision kind as named on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all-in",
        };
        write!(f, "{}", s)
    }
}

/// A state transition request against a room snapshot.
///
/// Commands carry no player identity; `Room::apply` binds the acting
/// player so a session can never smuggle a command for someone else.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Register a (new or returning) player record; idempotent by id.
    Join { name: String, emoji: String },
    Sit { seat: i32 },
    Stand,
    Ready { ready: bool },
    Rebuy,
    Cashout,
    Leave,
    Action {
        kind: ActionKind,
        amount: Option<Chips>,
    },
    Propose {
        pot_winners: BTreeMap<String, BTreeSet<ID<Player>>>,
    },
    Confirm,
    Reject,
    EndGame,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Command::Join { name, .. } => write!(f, "join({})", name),
            Command::Sit { seat } => write!(f, "sit({})", seat),
            Command::Stand => write!(f, "stand"),
            Command::Ready { ready } => write!(f, "ready({})", ready),
            Command::Rebuy => write!(f, "rebuy"),
            Command::Cashout => write!(f, "cashout"),
            Command::Leave => write!(f, "leave"),
            Command::Action { kind, amount } => match amount {
                Some(n) => write!(f, "action({} {})", kind, n),
                None => write!(f, "action({})", kind),
            },
            Command::Propose { .. } => write!(f, "propose"),
            Command::Confirm => write!(f, "confirm"),
            Command::Reject => write!(f, "reject"),
            Command::EndGame => write!(f, "end_game"),
        }
    }
}
