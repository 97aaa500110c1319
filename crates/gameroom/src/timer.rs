use rack_core::*;
use std::time::Duration;
use tokio::time::Instant;

/// Liveness and teardown timings for a room actor.
#[derive(Debug, Clone, Copy)]
pub struct LivenessConfig {
    /// How often the actor sweeps for stale sessions.
    pub sweep: Duration,
    /// Heartbeat silence after which a player shows as disconnected.
    /// Their turn keeps blocking; nobody is folded for lag.
    pub timeout: Duration,
    /// How long an empty room lingers before teardown.
    pub idle: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            sweep: Duration::from_secs(HEARTBEAT_INTERVAL),
            timeout: Duration::from_secs(LIVENESS_TIMEOUT),
            idle: Duration::from_secs(ROOM_IDLE_TTL),
        }
    }
}

impl LivenessConfig {
    /// True when a heartbeat from this instant has gone stale.
    pub fn stale(&self, last: Instant) -> bool {
        Instant::now().duration_since(last) >= self.timeout
    }
    /// True when an empty room has idled past its teardown deadline.
    pub fn expired(&self, empty_since: Instant) -> bool {
        Instant::now().duration_since(empty_since) >= self.idle
    }
}
