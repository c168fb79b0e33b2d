//! Half-open integer frame intervals.
//!
//! `FrameInterval` is the fundamental unit of timeline geometry: an immutable
//! `[begin, begin + duration)` span of integer frames. Every constructor
//! clamps negative inputs to zero, so all interval arithmetic is total —
//! there are no error cases, only normalized results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable half-open frame span `[begin, end)` where `end = begin + duration`.
///
/// Both `begin` and `duration` are guaranteed non-negative; constructors
/// silently clamp negative inputs to zero rather than rejecting them.
/// Copied by value everywhere, never mutated in place.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawInterval")]
pub struct FrameInterval {
    begin: i64,
    duration: i64,
}

/// Unvalidated mirror of [`FrameInterval`] used to re-apply the clamp
/// invariant when deserializing.
#[derive(Deserialize)]
struct RawInterval {
    begin: i64,
    duration: i64,
}

impl From<RawInterval> for FrameInterval {
    fn from(raw: RawInterval) -> Self {
        Self::new(raw.begin, raw.duration)
    }
}

impl FrameInterval {
    /// The empty interval `[0, 0)`.
    pub const EMPTY: FrameInterval = FrameInterval {
        begin: 0,
        duration: 0,
    };

    /// Create an interval from a begin frame and a duration.
    ///
    /// Negative `begin` or `duration` are clamped to 0.
    pub fn new(begin: i64, duration: i64) -> Self {
        Self {
            begin: begin.max(0),
            duration: duration.max(0),
        }
    }

    /// Create an interval from a begin frame and an exclusive end frame.
    ///
    /// The duration is computed from the raw (unclamped) `begin`, then both
    /// fields are clamped: `from_index(-5, 10)` yields `[0, 15)`.
    pub fn from_index(begin: i64, end_exclusive: i64) -> Self {
        Self::new(begin, end_exclusive - begin)
    }

    /// First frame inside the interval.
    pub fn begin(&self) -> i64 {
        self.begin
    }

    /// Number of frames spanned.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Exclusive end frame (`begin + duration`).
    pub fn end(&self) -> i64 {
        self.begin + self.duration
    }

    /// Whether the interval spans zero frames.
    pub fn is_empty(&self) -> bool {
        self.duration == 0
    }

    /// Whether `frame` falls inside the interval (`begin <= frame < end`).
    pub fn contains_frame(&self, frame: i64) -> bool {
        frame >= self.begin && frame < self.end()
    }

    /// Whether two intervals overlap by at least one frame.
    ///
    /// Half-open semantics: intervals that merely touch at a shared boundary
    /// (`[0, 10)` and `[10, 20)`) do NOT intersect.
    pub fn intersects(&self, other: FrameInterval) -> bool {
        self.begin < other.end() && self.end() > other.begin
    }

    /// Grow the interval by `amount` frames on each side.
    ///
    /// `amount` may be negative (shrinks instead); the result is re-clamped.
    pub fn expand(&self, amount: i64) -> Self {
        Self::new(self.begin - amount, self.duration + amount * 2)
    }

    /// Shrink the interval by `amount` frames on each side.
    ///
    /// Inverse of [`expand`](Self::expand); the result is re-clamped, so
    /// over-contracting collapses toward an empty interval.
    pub fn contract(&self, amount: i64) -> Self {
        self.expand(-amount)
    }

    /// Shift the whole interval by `frames`, keeping the duration.
    ///
    /// Shifting past frame 0 clamps the begin without restoring it later.
    pub fn offset(&self, frames: i64) -> Self {
        Self::new(self.begin + frames, self.duration)
    }

    /// Same span length starting at `begin`.
    pub fn with_begin(&self, begin: i64) -> Self {
        Self::new(begin, self.duration)
    }

    /// Same begin with a new duration.
    pub fn with_duration(&self, duration: i64) -> Self {
        Self::new(self.begin, duration)
    }

    /// Same begin with the end moved to `end_exclusive`.
    pub fn with_end(&self, end_exclusive: i64) -> Self {
        Self::from_index(self.begin, end_exclusive)
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn union(&self, other: FrameInterval) -> Self {
        Self::from_index(self.begin.min(other.begin), self.end().max(other.end()))
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end())
    }
}
