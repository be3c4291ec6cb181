//! Horizontal timeline projection.
//!
//! The time axis runs left to right; concurrent instances stack into
//! rows. Per-date layouts are cached internally and refreshed only
//! through `invalidate_date_layout` - there is no dependency tracking,
//! so the embedder must invalidate after mutating an item's date or
//! span. The cache is deliberately single-threaded (`&mut self`).

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use koyomi_core::event::Instance;
use koyomi_core::geometry::MappedRect;
use koyomi_core::view::TimelineConfig;

use super::{count_px, day_bounds, hours_between, require_positive};
use crate::error::{LayoutError, LayoutResult};
use crate::slot::compute_layout;

/// Row placement computed for one date.
#[derive(Debug, Clone, Default)]
struct DateLayout {
    rows: HashMap<Instance, usize>,
    peak: usize,
}

/// Maps instances onto a horizontal per-date timeline.
#[derive(Debug)]
pub struct TimelineMapper {
    config: TimelineConfig,
    date_layouts: HashMap<NaiveDate, DateLayout>,
}

impl TimelineMapper {
    /// ## Summary
    /// Creates a timeline mapper, validating the pixel metrics.
    ///
    /// ## Errors
    /// Returns `LayoutError::InvalidConfig` for non-positive pixel
    /// densities/heights or a negative row gap.
    pub fn new(config: TimelineConfig) -> LayoutResult<Self> {
        require_positive(config.px_per_hour, "px_per_hour")?;
        require_positive(config.item_height_px, "item_height_px")?;
        if !config.row_gap_px.is_finite() || config.row_gap_px < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "row_gap_px must be non-negative, got {}",
                config.row_gap_px
            )));
        }
        Ok(Self {
            config,
            date_layouts: HashMap::new(),
        })
    }

    /// ## Summary
    /// Pixel height needed to stack the date's peak concurrency:
    /// `peak * item_height + (peak - 1) * row_gap`, or 0 for an empty
    /// date. Served from the per-date cache when present.
    pub fn required_height(&mut self, date: NaiveDate, instances: &[Instance]) -> f64 {
        let peak = self.layout_for(date, instances).peak;
        if peak == 0 {
            return 0.0;
        }
        count_px(peak) * self.config.item_height_px
            + count_px(peak - 1) * self.config.row_gap_px
    }

    /// ## Summary
    /// Maps every instance intersecting `date`, clipped to the date.
    ///
    /// Returns `(input index, rect)` pairs; x/width come from the
    /// configured pixel-per-hour density, y from the cached row
    /// assignment. Left/right anchors are cleared where clipping moved
    /// the corresponding edge.
    pub fn map_date(
        &mut self,
        date: NaiveDate,
        instances: &[Instance],
    ) -> Vec<(usize, MappedRect)> {
        let item_height = self.config.item_height_px;
        let row_stride = self.config.item_height_px + self.config.row_gap_px;
        let px_per_hour = self.config.px_per_hour;
        let (day_start, day_end) = day_bounds(date);

        let layout = self.layout_for(date, instances);
        let mut rects = Vec::new();
        for (index, instance) in instances.iter().enumerate() {
            if !visible_on(instance, day_start, day_end) {
                continue;
            }
            let start = instance.start.max(day_start);
            let end = instance.end.min(day_end);
            let row = layout.rows.get(instance).copied().unwrap_or(0);

            rects.push((
                index,
                MappedRect {
                    x: hours_between(day_start, start) * px_per_hour,
                    y: count_px(row) * row_stride,
                    width: hours_between(start, end) * px_per_hour,
                    height: item_height,
                    show_left_anchor: start == instance.start,
                    show_right_anchor: end == instance.end,
                    show_top_anchor: true,
                    show_bottom_anchor: true,
                },
            ));
        }
        rects
    }

    /// ## Summary
    /// Drops the cached layout for a date. Must be called after a
    /// drag/resize changes which instances fall on the date.
    pub fn invalidate_date_layout(&mut self, date: NaiveDate) -> bool {
        let removed = self.date_layouts.remove(&date).is_some();
        tracing::trace!(%date, removed, "invalidated timeline date layout");
        removed
    }

    /// Cached layout for the date, computing it on first use.
    fn layout_for(&mut self, date: NaiveDate, instances: &[Instance]) -> &DateLayout {
        self.date_layouts
            .entry(date)
            .or_insert_with(|| Self::compute_date_layout(date, instances))
    }

    fn compute_date_layout(date: NaiveDate, instances: &[Instance]) -> DateLayout {
        let (day_start, day_end) = day_bounds(date);
        let mut originals = Vec::new();
        let mut clipped = Vec::new();
        for instance in instances {
            if !visible_on(instance, day_start, day_end) {
                continue;
            }
            originals.push(*instance);
            clipped.push(Instance {
                event_id: instance.event_id,
                start: instance.start.max(day_start),
                end: instance.end.min(day_end),
            });
        }

        let assignments = compute_layout(&clipped);
        let peak = assignments
            .iter()
            .map(|assignment| assignment.column_count)
            .max()
            .unwrap_or(0);
        let rows = originals
            .into_iter()
            .zip(assignments.iter().map(|assignment| assignment.column))
            .collect();
        DateLayout { rows, peak }
    }
}

/// Visibility of an instance on a day span; degenerate instances are
/// never visible.
fn visible_on(instance: &Instance, day_start: NaiveDateTime, day_end: NaiveDateTime) -> bool {
    instance.start < instance.end && instance.start < day_end && day_start < instance.end
}
