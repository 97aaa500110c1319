use rack_core::*;
use rack_engine::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Messages sent from client to server over WebSocket.
///
/// Tagged JSON frames; unknown tags or malformed payloads fail to decode
/// and surface as a validation error to the sender only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat carrying an opaque client timestamp.
    Ping { timestamp: serde_json::Value },
    Sit { seat: i32 },
    Stand,
    Ready {
        #[serde(default = "yes")]
        ready: bool,
    },
    Action {
        action: ActionKind,
        #[serde(default)]
        amount: Option<Chips>,
    },
    ProposeSettle {
        pot_winners: BTreeMap<String, BTreeSet<ID<Player>>>,
    },
    ConfirmSettle,
    RejectSettle,
    Rebuy,
    Cashout,
    EndGame,
}

fn yes() -> bool {
    true
}

/// Translates wire frames into engine commands.
pub struct Protocol;

impl Protocol {
    /// Parses a client frame; unknown tags become `Validation` errors.
    pub fn decode(text: &str) -> Result<ClientMessage, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::Validation(e.to_string()))
    }
    /// Converts a frame into an engine command. `Ping` is transport-level
    /// and has no engine counterpart.
    pub fn command(message: ClientMessage) -> Option<Command> {
        match message {
            ClientMessage::Ping { .. } => None,
            ClientMessage::Sit { seat } => Some(Command::Sit { seat }),
            ClientMessage::Stand => Some(Command::Stand),
            ClientMessage::Ready { ready } => Some(Command::Ready { ready }),
            ClientMessage::Action { action, amount } => Some(Command::Action {
                kind: action,
                amount,
            }),
            ClientMessage::ProposeSettle { pot_winners } => {
                Some(Command::Propose { pot_winners })
            }
            ClientMessage::ConfirmSettle => Some(Command::Confirm),
            ClientMessage::RejectSettle => Some(Command::Reject),
            ClientMessage::Rebuy => Some(Command::Rebuy),
            ClientMessage::Cashout => Some(Command::Cashout),
            ClientMessage::EndGame => Some(Command::EndGame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_frames() {
        assert_eq!(
            Protocol::decode(r#"{"type":"sit","seat":3}"#).unwrap(),
            ClientMessage::Sit { seat: 3 }
        );
        assert_eq!(
            Protocol::decode(r#"{"type":"ready"}"#).unwrap(),
            ClientMessage::Ready { ready: true }
        );
        assert_eq!(
            Protocol::decode(r#"{"type":"action","action":"raise","amount":60}"#).unwrap(),
            ClientMessage::Action {
                action: ActionKind::Raise,
                amount: Some(60)
            }
        );
        assert_eq!(
            Protocol::decode(r#"{"type":"action","action":"all_in"}"#).unwrap(),
            ClientMessage::Action {
                action: ActionKind::AllIn,
                amount: None
            }
        );
        assert_eq!(
            Protocol::decode(r#"{"type":"confirm_settle"}"#).unwrap(),
            ClientMessage::ConfirmSettle
        );
    }

    #[test]
    fn decode_propose_settle_winner_map() {
        let frame = r#"{"type":"propose_settle","pot_winners":{"pot-0":["p1","p2"]}}"#;
        let msg = Protocol::decode(frame).unwrap();
        match msg {
            ClientMessage::ProposeSettle { pot_winners } => {
                assert_eq!(pot_winners["pot-0"].len(), 2);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn decode_unknown_tag_is_validation() {
        assert!(matches!(
            Protocol::decode(r#"{"type":"deal_me_in"}"#),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            Protocol::decode("not even json"),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn ping_has_no_engine_command() {
        let ping = Protocol::decode(r#"{"type":"ping","timestamp":123}"#).unwrap();
        assert!(Protocol::command(ping).is_none());
        let stand = Protocol::decode(r#"{"type":"stand"}"#).unwrap();
        assert_eq!(Protocol::command(stand), Some(Command::Stand));
    }
}
