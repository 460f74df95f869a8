//! Identifiers for kernel entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag bit set in a MyParentTid result when the parent no longer exists.
///
/// The numeric tid portion is still present under the tag so callers that
/// do not care about liveness may mask it off and ignore it.
pub const PARENT_EXITED_BIT: i64 = 1 << 31;

/// Stable task identifier.
///
/// Tids are derived from arena slot position (`slot index + tid base`), so a
/// tid stays meaningful for the lifetime of one task but may later denote an
/// unrelated task occupying the reused slot. Code that must detect reuse
/// pairs the tid with a [`Generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tid(u32);

impl Tid {
    /// Creates a tid from its raw numeric value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the raw value widened for the return-register encoding.
    pub const fn as_return_value(self) -> i64 {
        self.0 as i64
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tid({})", self.0)
    }
}

/// Scheduling priority level.
///
/// A larger level is more urgent. Validity against the configured number of
/// levels is checked at the syscall boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Priority(u8);

impl Priority {
    /// Creates a priority from its numeric level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Returns the numeric level.
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Per-slot reuse counter.
///
/// Incremented every time an arena slot is freed, so any stored reference
/// stamped with an older generation can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Generation(u32);

impl Generation {
    /// The generation of a slot that has never been freed.
    pub const fn initial() -> Self {
        Self(0)
    }

    /// Returns the generation after one more free of the slot.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Returns the raw counter value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

/// Identifier for an interrupt/event wake-up channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u32);

impl EventId {
    /// Creates an event id from its raw numeric value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}
