//! Per-view mapper configuration.
//!
//! Construction-time configuration errors fail fast; the one deliberate
//! leniency is that non-positive subdivision counts are clamped to 1
//! instead of rejected.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The configured working-hour window used to hide non-business time in
/// the day view. Validated at construction: zero-length or inverted
/// windows are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingHours {
    /// ## Summary
    /// Creates a working-hour window.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidWorkingHours` if `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidWorkingHours(format!(
                "start {start} is not before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Clamps a time-of-day into the window.
    #[must_use]
    pub fn clamp(&self, time: NaiveTime) -> NaiveTime {
        time.clamp(self.start, self.end)
    }
}

/// Configuration for the vertical day view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayViewConfig {
    /// Pixel height of one time slot (one subdivision of an hour).
    pub slot_height_px: f64,
    /// Slots per hour, e.g. 4 for 15-minute slots. Values <= 0 are
    /// clamped to 1 rather than rejected.
    pub subdivisions_per_hour: i32,
    /// When set, instants outside this window are clipped to it.
    pub working_hours: Option<WorkingHours>,
    /// Horizontal inset applied inside each concurrency column.
    pub column_margin_px: f64,
}

impl DayViewConfig {
    /// Subdivision count with the clamp leniency applied.
    #[must_use]
    pub fn effective_subdivisions(&self) -> i32 {
        self.subdivisions_per_hour.max(1)
    }

    /// Vertical pixel density: `slot_height_px / (60 / subdivisions)`.
    #[must_use]
    pub fn pixels_per_minute(&self) -> f64 {
        self.slot_height_px / (60.0 / f64::from(self.effective_subdivisions()))
    }
}

/// Configuration for the 7-column week grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekGridConfig {
    pub hour_height_px: f64,
    /// Horizontal inset applied inside each bucket stride.
    pub item_margin_px: f64,
}

/// Configuration for the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthGridConfig {
    /// Pixel height of one item lane inside a week row.
    pub item_height_px: f64,
    /// Vertical gap between stacked lanes.
    pub item_margin_px: f64,
}

/// Configuration for the horizontal timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub px_per_hour: f64,
    pub item_height_px: f64,
    /// Gap between stacked rows.
    pub row_gap_px: f64,
}
