//! Discovery clocks.
//!
//! A technology records the clock's marker at the moment it is discovered.
//! Markers only need to be non-decreasing; two discoveries may share one.
//!
//! - [`BlockClock`] models a ledger block height. The host advances it
//!   explicitly, and every discovery within one block shares its height.
//! - [`WallClock`] reads milliseconds since the Unix epoch and refuses to
//!   go backwards if the system clock is adjusted.

use chrono::Utc;

use crate::config::{ClockConfig, ClockSource};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Block height would overflow.
    #[error("block height overflow: cannot advance beyond u64::MAX")]
    HeightOverflow,

    /// The clock does not support explicit advancement.
    #[error("the {0} clock cannot be advanced explicitly")]
    NotAdvanceable(&'static str),
}

/// Source of non-decreasing discovery markers.
pub trait DiscoveryClock: Send + core::fmt::Debug {
    /// Return the current marker. Never lower than a previous return.
    fn marker(&mut self) -> u64;

    /// Move to the next block and return its height.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::NotAdvanceable`] for clocks that advance on
    /// their own, or [`ClockError::HeightOverflow`] at `u64::MAX`.
    fn advance(&mut self) -> Result<u64, ClockError>;
}

/// Build the clock selected by `config`.
pub fn from_config(config: &ClockConfig) -> Box<dyn DiscoveryClock> {
    match config.source {
        ClockSource::Block => Box::new(BlockClock::starting_at(config.start_block)),
        ClockSource::Wall => Box::new(WallClock::new()),
    }
}

// ---------------------------------------------------------------------------
// BlockClock
// ---------------------------------------------------------------------------

/// Block height counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockClock {
    height: u64,
}

impl BlockClock {
    /// Create a clock at height 0.
    pub const fn new() -> Self {
        Self { height: 0 }
    }

    /// Create a clock at the given height.
    pub const fn starting_at(height: u64) -> Self {
        Self { height }
    }

    /// Return the current height.
    pub const fn height(&self) -> u64 {
        self.height
    }
}

impl DiscoveryClock for BlockClock {
    fn marker(&mut self) -> u64 {
        self.height
    }

    fn advance(&mut self) -> Result<u64, ClockError> {
        self.height = self.height.checked_add(1).ok_or(ClockError::HeightOverflow)?;
        Ok(self.height)
    }
}

// ---------------------------------------------------------------------------
// WallClock
// ---------------------------------------------------------------------------

/// Millisecond wall clock clamped to never go backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallClock {
    last: u64,
}

impl WallClock {
    /// Create a wall clock.
    pub const fn new() -> Self {
        Self { last: 0 }
    }
}

impl DiscoveryClock for WallClock {
    fn marker(&mut self) -> u64 {
        // Pre-epoch system times collapse to 0 rather than wrapping.
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = self.last.max(now);
        self.last
    }

    fn advance(&mut self) -> Result<u64, ClockError> {
        Err(ClockError::NotAdvanceable("wall"))
    }
}
