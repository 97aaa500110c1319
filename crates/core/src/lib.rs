//! Core type aliases, identifiers, and constants for chiprack.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the chiprack workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes, bet amounts, and pot totals in chips.
/// Signed so that net profit/loss arithmetic stays in one type.
pub type Chips = i64;
/// Seat index around the table.
pub type Position = usize;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over string ids.
///
/// Room ids are short human-readable codes; player ids derive from the
/// client's stable device id so reconnects reattach to the same record.
/// Freshly generated ids fall back to UUIDv7 strings.
pub struct ID<T> {
    inner: String,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn new(inner: impl Into<String>) -> Self {
        Self {
            inner: inner.into(),
            marker: PhantomData,
        }
    }
    pub fn as_str(&self) -> &str {
        &self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying string.
    /// Useful for converting between marker types.
    pub fn cast<U>(&self) -> ID<U> {
        ID {
            inner: self.inner.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> From<String> for ID<T> {
    fn from(inner: String) -> Self {
        Self::new(inner)
    }
}
impl<T> From<&str> for ID<T> {
    fn from(inner: &str) -> Self {
        Self::new(inner)
    }
}
impl<T> From<ID<T>> for String {
    fn from(id: ID<T>) -> Self {
        id.inner
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::new(uuid::Uuid::now_v7().simple().to_string())
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <String as serde::Deserialize>::deserialize(deserializer).map(Self::new)
    }
}

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Number of seats at a table.
pub const SEATS: usize = 9;
/// Wire value for an unseated player.
pub const NO_SEAT: i32 = -1;

// ============================================================================
// SESSION PARAMETERS
// ============================================================================
/// Client heartbeat interval (seconds).
pub const HEARTBEAT_INTERVAL: u64 = 3;
/// Liveness timeout before a player is marked disconnected (seconds).
/// Disconnection never forfeits the player's turn.
pub const LIVENESS_TIMEOUT: u64 = 12;
/// How long an empty room lingers before it is torn down (seconds).
pub const ROOM_IDLE_TTL: u64 = 900;
/// WebSocket close code telling the client the room or player is invalid.
pub const CLOSE_INVALID: u16 = 4001;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
