/// Typed failures produced by engine transitions.
///
/// Engine errors never mutate state: `Room::apply` returns the untouched
/// snapshot alongside the error, so callers can always fall back to the
/// pre-command state. The categories map onto transport surfaces (HTTP
/// status codes, `error` frames, or the invalid-session close code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Room or player missing.
    NotFound(String),
    /// Malformed configuration or frame.
    Validation(String),
    /// Command violates engine preconditions in the current phase.
    IllegalAction(String),
    /// Action attempted outside the player's turn.
    NotYourTurn,
    /// Readiness gate: the player must rebuy before playing on.
    MustRebuy,
    /// Readiness gate: the player must cash out before playing on.
    MustCashout,
    /// Seat taken, duplicate proposal, and similar contention.
    Conflict(String),
    /// Store or IO failure; the command is retryable.
    Internal(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(s) => write!(f, "not found: {}", s),
            Self::Validation(s) => write!(f, "invalid: {}", s),
            Self::IllegalAction(s) => write!(f, "illegal action: {}", s),
            Self::NotYourTurn => write!(f, "not your turn"),
            Self::MustRebuy => write!(f, "rebuy required before readying up"),
            Self::MustCashout => write!(f, "cashout required before readying up"),
            Self::Conflict(s) => write!(f, "conflict: {}", s),
            Self::Internal(s) => write!(f, "internal error: {}", s),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn display_carries_detail() {
        let e = EngineError::Conflict("seat 3 taken".to_string());
        assert_eq!(e.to_string(), "conflict: seat 3 taken");
        assert_eq!(EngineError::NotYourTurn.to_string(), "not your turn");
    }
}
