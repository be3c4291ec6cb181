//! Slot layout and pixel mapping for the koyomi scheduler core.
//!
//! Partitions overlapping instances into concurrency columns and
//! converts them into pixel rectangles with continuation anchors for
//! the day, week, month, and timeline grid projections.

pub mod error;
pub mod mapper;
pub mod slot;
