//! The position mapper family: one module per grid projection.
//!
//! Each mapper consumes slot assignments plus the embedder's
//! pre-measured geometry and produces `MappedRect`s, one per grid cell
//! an instance's visible portion intersects. Anchor flags mark whether
//! a rendered edge is the item's true edge or a grid truncation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

pub mod day;
pub mod month;
pub mod timeline;
pub mod week;

pub use day::DayViewMapper;
pub use month::MonthGridMapper;
pub use timeline::TimelineMapper;
pub use week::WeekGridMapper;

/// Monday of the week containing `date`.
pub(crate) fn week_monday(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The half-open day span `[00:00, next day 00:00)`.
pub(crate) fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(chrono::NaiveTime::MIN);
    (start, start + TimeDelta::days(1))
}

/// Fractional minutes between two instants.
#[expect(clippy::cast_precision_loss, reason = "in-window deltas are far below 2^52 ms")]
pub(crate) fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    delta.num_milliseconds() as f64 / 60_000.0
}

/// Pixel-space conversion for small counts (columns, rows, buckets).
#[expect(clippy::cast_precision_loss, reason = "layout counts are far below 2^52")]
pub(crate) fn count_px(value: usize) -> f64 {
    value as f64
}

/// Fractional hours between two instants.
pub(crate) fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    minutes_between(from, to) / 60.0
}

/// Fails fast on non-positive or non-finite pixel metrics.
pub(crate) fn require_positive(value: f64, name: &str) -> crate::error::LayoutResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(crate::error::LayoutError::InvalidConfig(format!(
            "{name} must be a positive finite pixel value, got {value}"
        )))
    }
}
