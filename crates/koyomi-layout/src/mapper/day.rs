//! Vertical single-day projection.

use chrono::NaiveDate;
use koyomi_core::event::Instance;
use koyomi_core::geometry::{ContainerSize, MappedRect};
use koyomi_core::view::DayViewConfig;

use super::{count_px, day_bounds, minutes_between, require_positive};
use crate::error::LayoutResult;
use crate::slot::SlotAssignment;

/// Maps instances onto a single day column, stacking concurrent items
/// into the columns assigned by the slot layout engine.
#[derive(Debug, Clone)]
pub struct DayViewMapper {
    config: DayViewConfig,
}

impl DayViewMapper {
    /// ## Summary
    /// Creates a day-view mapper, validating the pixel metrics.
    ///
    /// Non-positive subdivision counts are deliberately *not* an error;
    /// they are clamped to 1 (see `DayViewConfig`).
    ///
    /// ## Errors
    /// Returns `LayoutError::InvalidConfig` for a non-positive slot
    /// height or a negative column margin.
    pub fn new(config: DayViewConfig) -> LayoutResult<Self> {
        require_positive(config.slot_height_px, "slot_height_px")?;
        if !config.column_margin_px.is_finite() || config.column_margin_px < 0.0 {
            return Err(crate::error::LayoutError::InvalidConfig(format!(
                "column_margin_px must be non-negative, got {}",
                config.column_margin_px
            )));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &DayViewConfig {
        &self.config
    }

    /// ## Summary
    /// Maps one instance for `reference_date`.
    ///
    /// The visible portion is the instance's span clipped to the day
    /// and, when working hours are configured, to the working window;
    /// the top/bottom anchors are cleared when clipping moved the
    /// corresponding edge. Returns `None` when nothing of the instance
    /// is visible on this day.
    #[must_use]
    pub fn map(
        &self,
        instance: &Instance,
        slot: &SlotAssignment,
        container: ContainerSize,
        reference_date: NaiveDate,
    ) -> Option<MappedRect> {
        let (day_start, day_end) = day_bounds(reference_date);
        let (visible_from, visible_to) = match self.config.working_hours {
            Some(hours) => (
                reference_date.and_time(hours.start()),
                reference_date.and_time(hours.end()),
            ),
            None => (day_start, day_end),
        };

        let start = instance.start.max(visible_from);
        let end = instance.end.min(visible_to);
        if end <= start {
            return None;
        }

        let pixels_per_minute = self.config.pixels_per_minute();
        let y = minutes_between(visible_from, start) * pixels_per_minute;
        let height = minutes_between(start, end) * pixels_per_minute;

        let column_count = slot.column_count.max(1);
        let column_width = container.width / count_px(column_count);
        let margin = self.config.column_margin_px;
        let x = count_px(slot.column) * column_width + margin;
        let width = (column_width - 2.0 * margin).max(0.0);

        Some(MappedRect {
            x,
            y,
            width,
            height,
            show_left_anchor: true,
            show_right_anchor: true,
            show_top_anchor: start == instance.start,
            show_bottom_anchor: end == instance.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};
    use koyomi_core::event::EventId;
    use koyomi_core::view::WorkingHours;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date")
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date()
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    fn instance(start: NaiveDateTime, end: NaiveDateTime) -> Instance {
        Instance {
            event_id: EventId::new(),
            start,
            end,
        }
    }

    fn slot(column: usize, column_count: usize) -> SlotAssignment {
        SlotAssignment {
            event_id: EventId::new(),
            column,
            column_count,
        }
    }

    fn config() -> DayViewConfig {
        DayViewConfig {
            slot_height_px: 30.0,
            subdivisions_per_hour: 4,
            working_hours: None,
            column_margin_px: 2.0,
        }
    }

    fn container() -> ContainerSize {
        ContainerSize {
            width: 400.0,
            height: 2880.0,
        }
    }

    #[test]
    fn test_vertical_position_from_pixels_per_minute() {
        let mapper = DayViewMapper::new(config()).expect("valid config");
        let rect = mapper
            .map(&instance(at(9, 0), at(10, 30)), &slot(0, 1), container(), date())
            .expect("visible instance");
        // 2 px/min: 09:00 => y 1080, 90 minutes => height 180.
        assert!((rect.y - 1080.0).abs() < f64::EPSILON);
        assert!((rect.height - 180.0).abs() < f64::EPSILON);
        assert!(rect.show_top_anchor);
        assert!(rect.show_bottom_anchor);
    }

    #[test]
    fn test_columns_split_width_evenly_with_margin() {
        let mapper = DayViewMapper::new(config()).expect("valid config");
        let rect = mapper
            .map(&instance(at(9, 0), at(10, 0)), &slot(1, 2), container(), date())
            .expect("visible instance");
        // Two columns of 200px; column 1 starts at 200, inset by 2.
        assert!((rect.x - 202.0).abs() < f64::EPSILON);
        assert!((rect.width - 196.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_working_hours_clip_and_clear_anchors() {
        let hours = WorkingHours::new(
            NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        )
        .expect("valid hours");
        let mapper = DayViewMapper::new(DayViewConfig {
            working_hours: Some(hours),
            ..config()
        })
        .expect("valid config");

        let rect = mapper
            .map(&instance(at(8, 0), at(10, 0)), &slot(0, 1), container(), date())
            .expect("partially visible instance");
        // Clipped to 09:00; offsets are relative to the working window.
        assert!((rect.y - 0.0).abs() < f64::EPSILON);
        assert!((rect.height - 120.0).abs() < f64::EPSILON);
        assert!(!rect.show_top_anchor, "clipped start must clear the top anchor");
        assert!(rect.show_bottom_anchor);
    }

    #[test]
    fn test_instance_outside_working_hours_is_invisible() {
        let hours = WorkingHours::new(
            NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        )
        .expect("valid hours");
        let mapper = DayViewMapper::new(DayViewConfig {
            working_hours: Some(hours),
            ..config()
        })
        .expect("valid config");

        let rect = mapper.map(&instance(at(18, 0), at(19, 0)), &slot(0, 1), container(), date());
        assert!(rect.is_none());
    }

    #[test]
    fn test_instance_on_another_day_is_invisible() {
        let mapper = DayViewMapper::new(config()).expect("valid config");
        let other_day = NaiveDate::from_ymd_opt(2025, 11, 4).expect("valid date");
        let rect = mapper.map(&instance(at(9, 0), at(10, 0)), &slot(0, 1), container(), other_day);
        assert!(rect.is_none());
    }

    #[test]
    fn test_multi_day_instance_clips_to_day_bounds() {
        let mapper = DayViewMapper::new(config()).expect("valid config");
        let tomorrow = NaiveDate::from_ymd_opt(2025, 11, 4)
            .expect("valid date")
            .and_hms_opt(10, 0, 0)
            .expect("valid time");
        let rect = mapper
            .map(&instance(at(22, 0), tomorrow), &slot(0, 1), container(), date())
            .expect("visible instance");
        assert!(rect.show_top_anchor);
        assert!(!rect.show_bottom_anchor, "continuation past midnight clears the bottom anchor");
        // 22:00..24:00 at 2 px/min.
        assert!((rect.height - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let bad = DayViewConfig {
            slot_height_px: 0.0,
            ..config()
        };
        assert!(DayViewMapper::new(bad).is_err());

        let negative_margin = DayViewConfig {
            column_margin_px: -1.0,
            ..config()
        };
        assert!(DayViewMapper::new(negative_margin).is_err());
    }
}
