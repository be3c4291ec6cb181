//! Month grid projection.
//!
//! The grid is 7 columns wide and as many Monday-started week rows tall
//! as the reference month needs. An item spanning several rows emits
//! one rect per row; the left/right anchors appear only on the rows
//! holding the item's true start and true end, so intermediate rows
//! read as continuations.

use chrono::{Datelike, NaiveDate, TimeDelta};
use koyomi_core::event::Instance;
use koyomi_core::geometry::{ContainerSize, MappedRect};
use koyomi_core::view::MonthGridConfig;

use super::{count_px, require_positive, week_monday};
use crate::error::{LayoutError, LayoutResult};

/// Maps instances onto the month grid of the reference date.
#[derive(Debug, Clone)]
pub struct MonthGridMapper {
    config: MonthGridConfig,
}

/// Week-row geometry of one month.
#[derive(Debug, Clone, Copy)]
struct MonthGrid {
    start: NaiveDate,
    rows: usize,
}

impl MonthGrid {
    fn for_month(reference_date: NaiveDate) -> Self {
        let first_of_month = reference_date.with_day(1).unwrap_or(reference_date);
        let start = week_monday(first_of_month);
        let last_of_month = last_day_of_month(first_of_month);
        let days_from_start = (last_of_month - start).num_days().max(0);
        let rows = usize::try_from(days_from_start / 7).unwrap_or(0) + 1;
        Self { start, rows }
    }

    fn last(&self) -> NaiveDate {
        let rows = i64::try_from(self.rows).unwrap_or(1);
        self.start + TimeDelta::days(rows * 7 - 1)
    }

    fn row_of(&self, date: NaiveDate) -> usize {
        usize::try_from((date - self.start).num_days() / 7).unwrap_or(0)
    }
}

fn last_day_of_month(first_of_month: NaiveDate) -> NaiveDate {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(first_of_month)
}

impl MonthGridMapper {
    /// ## Summary
    /// Creates a month-grid mapper, validating the pixel metrics.
    ///
    /// ## Errors
    /// Returns `LayoutError::InvalidConfig` for a non-positive item
    /// height or a negative item margin.
    pub fn new(config: MonthGridConfig) -> LayoutResult<Self> {
        require_positive(config.item_height_px, "item_height_px")?;
        if !config.item_margin_px.is_finite() || config.item_margin_px < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "item_margin_px must be non-negative, got {}",
                config.item_margin_px
            )));
        }
        Ok(Self { config })
    }

    /// ## Summary
    /// Maps one instance onto the reference month, one rect per week
    /// row the instance's day span touches.
    ///
    /// The slot assignment's column selects the stacking lane inside
    /// each week row. Days outside the grid are clipped away; a span
    /// entirely outside the grid maps to nothing.
    #[must_use]
    pub fn map(
        &self,
        instance: &Instance,
        slot: &crate::slot::SlotAssignment,
        container: ContainerSize,
        reference_date: NaiveDate,
    ) -> Vec<MappedRect> {
        let grid = MonthGrid::for_month(reference_date);

        let start_date = instance.start.date();
        let end_date = if instance.end > instance.start {
            (instance.end - TimeDelta::microseconds(1)).date()
        } else {
            start_date
        };

        let visible_first = start_date.max(grid.start);
        let visible_last = end_date.min(grid.last());
        if visible_first > visible_last {
            return Vec::new();
        }

        let column_width = container.width / 7.0;
        let row_height = container.height / count_px(grid.rows);
        let lane_offset =
            count_px(slot.column) * (self.config.item_height_px + self.config.item_margin_px);

        let mut rects = Vec::new();
        for row in grid.row_of(visible_first)..=grid.row_of(visible_last) {
            let row_start = grid.start + TimeDelta::days(i64::try_from(row).unwrap_or(0) * 7);
            let row_last = row_start + TimeDelta::days(6);
            let segment_first = visible_first.max(row_start);
            let segment_last = visible_last.min(row_last);

            let start_column = (segment_first - row_start).num_days();
            let day_span = (segment_last - segment_first).num_days() + 1;

            #[expect(clippy::cast_precision_loss, reason = "day columns are 0..7")]
            rects.push(MappedRect {
                x: start_column as f64 * column_width,
                y: count_px(row) * row_height + lane_offset,
                width: day_span as f64 * column_width,
                height: self.config.item_height_px,
                show_left_anchor: segment_first == start_date,
                show_right_anchor: segment_last == end_date,
                show_top_anchor: true,
                show_bottom_anchor: true,
            });
        }
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use koyomi_core::event::EventId;
    use crate::slot::SlotAssignment;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 15).expect("valid date")
    }

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn instance(start: NaiveDateTime, end: NaiveDateTime) -> Instance {
        Instance {
            event_id: EventId::new(),
            start,
            end,
        }
    }

    fn slot(column: usize) -> SlotAssignment {
        SlotAssignment {
            event_id: EventId::new(),
            column,
            column_count: 1,
        }
    }

    fn mapper() -> MonthGridMapper {
        MonthGridMapper::new(MonthGridConfig {
            item_height_px: 20.0,
            item_margin_px: 2.0,
        })
        .expect("valid config")
    }

    fn container() -> ContainerSize {
        ContainerSize {
            width: 700.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_november_2025_grid_shape() {
        let grid = MonthGrid::for_month(reference());
        // November 2025 starts on a Saturday; the grid opens on Monday
        // October 27 and needs five week rows.
        assert_eq!(grid.start, NaiveDate::from_ymd_opt(2025, 10, 27).expect("valid date"));
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.last(), NaiveDate::from_ymd_opt(2025, 11, 30).expect("valid date"));
    }

    #[test]
    fn test_single_day_item_is_fully_anchored() {
        let rects = mapper().map(
            &instance(at(11, 26, 9), at(11, 26, 10)),
            &slot(0),
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 1);
        let rect = &rects[0];
        assert!(rect.show_left_anchor);
        assert!(rect.show_right_anchor);
        // Wednesday 11-26 sits in row 4 (0-based), column 2.
        assert!((rect.x - 200.0).abs() < f64::EPSILON);
        assert!((rect.y - 480.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_row_spanning_item_anchors_only_true_edges() {
        // Saturday 11-08 through Tuesday 11-11 crosses one row break.
        let rects = mapper().map(
            &instance(at(11, 8, 10), at(11, 11, 12)),
            &slot(0),
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 2);

        let first_row = &rects[0];
        assert!(first_row.show_left_anchor);
        assert!(!first_row.show_right_anchor, "item continues into the next row");
        // Saturday + Sunday.
        assert!((first_row.width - 200.0).abs() < f64::EPSILON);

        let second_row = &rects[1];
        assert!(!second_row.show_left_anchor, "item started in the previous row");
        assert!(second_row.show_right_anchor);
        assert!((second_row.x - 0.0).abs() < f64::EPSILON);
        // Monday + Tuesday.
        assert!((second_row.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_intermediate_row_shows_no_anchor() {
        // 11-08 (row 1) through 11-19 (row 3): row 2 is a continuation.
        let rects = mapper().map(
            &instance(at(11, 8, 0), at(11, 19, 23)),
            &slot(0),
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 3);
        let middle = &rects[1];
        assert!(!middle.show_left_anchor);
        assert!(!middle.show_right_anchor);
        // A full week row.
        assert!((middle.width - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lane_offset_from_slot_column() {
        let rects = mapper().map(
            &instance(at(11, 26, 9), at(11, 26, 10)),
            &slot(2),
            container(),
            reference(),
        );
        // Row 4 top plus two 22px lanes.
        assert!((rects[0].y - 524.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_midnight_end_does_not_bleed_into_next_day() {
        // Ends exactly at midnight: the half-open end day is 11-26.
        let rects = mapper().map(
            &instance(at(11, 26, 9), at(11, 27, 0)),
            &slot(0),
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 1);
        assert!((rects[0].width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_item_outside_grid_maps_to_nothing() {
        let rects = mapper().map(
            &instance(at(1, 5, 9), at(1, 5, 10)),
            &slot(0),
            container(),
            reference(),
        );
        assert!(rects.is_empty());
    }
}
