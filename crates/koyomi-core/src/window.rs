//! Half-open time windows.

use chrono::NaiveDateTime;

use crate::error::{CoreError, CoreResult};

/// A bounded, half-open time window `[from, to)`.
///
/// Every expansion and layout pass is computed against a window; there
/// is no unbounded enumeration anywhere in this workspace. `from == to`
/// is a legal empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl Window {
    /// ## Summary
    /// Creates a window, failing fast on inverted bounds.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidWindow` if `from > to`.
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> CoreResult<Self> {
        if from > to {
            return Err(CoreError::InvalidWindow(format!(
                "from {from} is after to {to}"
            )));
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub const fn from(&self) -> NaiveDateTime {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> NaiveDateTime {
        self.to
    }

    /// Returns true if `instant` lies inside `[from, to)`.
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.from <= instant && instant < self.to
    }

    /// Returns true if the half-open span `[start, end)` intersects this
    /// window. A span ending exactly at `from` does not intersect.
    #[must_use]
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.to && self.from < end
    }

    /// Returns true if `other` lies entirely inside this window.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    /// Window length, for tie-breaking between covering cache entries.
    #[must_use]
    pub fn span(&self) -> chrono::TimeDelta {
        self.to - self.from
    }
}
