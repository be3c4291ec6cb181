//! Seven-column week grid projection.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta, Timelike};
use koyomi_core::event::Instance;
use koyomi_core::geometry::{ContainerSize, MappedRect};
use koyomi_core::view::WeekGridConfig;

use super::{count_px, day_bounds, hours_between, require_positive, week_monday};
use crate::error::{LayoutError, LayoutResult};

/// Maps instances onto the Monday-started week containing the
/// reference date. Instances sharing a (day, hour) bucket split the
/// day-column's width evenly.
#[derive(Debug, Clone)]
pub struct WeekGridMapper {
    config: WeekGridConfig,
}

impl WeekGridMapper {
    /// ## Summary
    /// Creates a week-grid mapper, validating the pixel metrics.
    ///
    /// ## Errors
    /// Returns `LayoutError::InvalidConfig` for a non-positive hour
    /// height or a negative item margin.
    pub fn new(config: WeekGridConfig) -> LayoutResult<Self> {
        require_positive(config.hour_height_px, "hour_height_px")?;
        if !config.item_margin_px.is_finite() || config.item_margin_px < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "item_margin_px must be non-negative, got {}",
                config.item_margin_px
            )));
        }
        Ok(Self { config })
    }

    /// ## Summary
    /// Maps every instance visible in the reference date's week.
    ///
    /// Returns `(input index, rect)` pairs, one rect per day-column the
    /// instance's visible span touches: an instance continuing past
    /// midnight is split at each day boundary, with the top/bottom
    /// anchors marking which segment edges are the instance's true
    /// start and end. Degenerate instances render nothing.
    #[must_use]
    pub fn map_week(
        &self,
        instances: &[Instance],
        container: ContainerSize,
        reference_date: NaiveDate,
    ) -> Vec<(usize, MappedRect)> {
        struct Placed {
            index: usize,
            bucket: (u32, u32),
            position: usize,
            day_index: u32,
            visible_start: chrono::NaiveDateTime,
            visible_end: chrono::NaiveDateTime,
            true_start: bool,
            true_end: bool,
        }

        let week_start = week_monday(reference_date).and_time(chrono::NaiveTime::MIN);
        let week_end = week_start + TimeDelta::days(7);

        let mut bucket_sizes: HashMap<(u32, u32), usize> = HashMap::new();
        let mut placed: Vec<Placed> = Vec::new();

        for (index, instance) in instances.iter().enumerate() {
            if instance.end <= instance.start
                || instance.end <= week_start
                || week_end <= instance.start
            {
                continue;
            }
            // One segment per day the visible span touches.
            let mut cursor = instance.start.max(week_start);
            let visible_until = instance.end.min(week_end);
            while cursor < visible_until {
                let day = cursor.date();
                let (_, day_end) = day_bounds(day);
                let segment_end = visible_until.min(day_end);
                let day_index = day.weekday().num_days_from_monday();
                let bucket = (day_index, cursor.hour());

                let position = *bucket_sizes
                    .entry(bucket)
                    .and_modify(|size| *size += 1)
                    .or_insert(0);
                placed.push(Placed {
                    index,
                    bucket,
                    position,
                    day_index,
                    visible_start: cursor,
                    visible_end: segment_end,
                    true_start: cursor == instance.start,
                    true_end: segment_end == instance.end,
                });
                cursor = day_end;
            }
        }

        let day_width = container.width / 7.0;
        let margin = self.config.item_margin_px;

        placed
            .into_iter()
            .map(|item| {
                let siblings = bucket_sizes.get(&item.bucket).map_or(1, |size| size + 1);
                let stride = day_width / count_px(siblings);
                let x = f64::from(item.day_index) * day_width
                    + count_px(item.position) * stride
                    + margin;
                let width = (stride - 2.0 * margin).max(0.0);

                let (day_start, _) = day_bounds(item.visible_start.date());
                let y = hours_between(day_start, item.visible_start) * self.config.hour_height_px;
                let height =
                    hours_between(item.visible_start, item.visible_end) * self.config.hour_height_px;

                (
                    item.index,
                    MappedRect {
                        x,
                        y,
                        width,
                        height,
                        show_left_anchor: true,
                        show_right_anchor: true,
                        show_top_anchor: item.true_start,
                        show_bottom_anchor: item.true_end,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use koyomi_core::event::EventId;

    fn reference() -> NaiveDate {
        // A Wednesday; its week starts Monday 2025-11-24.
        NaiveDate::from_ymd_opt(2025, 11, 26).expect("valid date")
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, day)
            .expect("valid date")
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

    fn mapper() -> WeekGridMapper {
        WeekGridMapper::new(WeekGridConfig {
            hour_height_px: 60.0,
            item_margin_px: 1.0,
        })
        .expect("valid config")
    }

    fn container() -> ContainerSize {
        ContainerSize {
            width: 700.0,
            height: 1440.0,
        }
    }

    #[test]
    fn test_day_column_and_hour_position() {
        let rects = mapper().map_week(
            &[instance(at(26, 9, 30), at(26, 10, 0))],
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 1);
        let (index, rect) = &rects[0];
        assert_eq!(*index, 0);
        // Wednesday is day-column 2 of a 100px column, inset by 1.
        assert!((rect.x - 201.0).abs() < f64::EPSILON);
        assert!((rect.width - 98.0).abs() < f64::EPSILON);
        // 09:30 at 60 px/hour.
        assert!((rect.y - 570.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bucket_members_split_the_column() {
        let rects = mapper().map_week(
            &[
                instance(at(26, 9, 0), at(26, 10, 0)),
                instance(at(26, 9, 30), at(26, 10, 30)),
            ],
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 2);
        let (_, first) = &rects[0];
        let (_, second) = &rects[1];
        // Two members in the (Wed, 09) bucket: 50px stride each.
        assert!((first.x - 201.0).abs() < f64::EPSILON);
        assert!((first.width - 48.0).abs() < f64::EPSILON);
        assert!((second.x - 251.0).abs() < f64::EPSILON);
        assert!((second.width - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_different_hours_use_full_column() {
        let rects = mapper().map_week(
            &[
                instance(at(26, 9, 0), at(26, 10, 0)),
                instance(at(26, 11, 0), at(26, 12, 0)),
            ],
            container(),
            reference(),
        );
        for (_, rect) in &rects {
            assert!((rect.width - 98.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_midnight_crossing_renders_a_segment_in_each_day_column() {
        let rects = mapper().map_week(
            &[instance(at(26, 23, 0), at(27, 1, 0))],
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 2, "one rect per day the span touches");

        let (index, wednesday) = &rects[0];
        assert_eq!(*index, 0);
        assert!((wednesday.x - 201.0).abs() < f64::EPSILON);
        assert!((wednesday.y - 1380.0).abs() < f64::EPSILON);
        assert!((wednesday.height - 60.0).abs() < f64::EPSILON);
        assert!(wednesday.show_top_anchor);
        assert!(!wednesday.show_bottom_anchor);

        let (index, thursday) = &rects[1];
        assert_eq!(*index, 0);
        assert!((thursday.x - 301.0).abs() < f64::EPSILON);
        assert!((thursday.y - 0.0).abs() < f64::EPSILON);
        assert!((thursday.height - 60.0).abs() < f64::EPSILON);
        assert!(!thursday.show_top_anchor);
        assert!(thursday.show_bottom_anchor);
    }

    #[test]
    fn test_intermediate_day_segment_has_no_true_edges() {
        // Tuesday 22:00 through Thursday 02:00: Wednesday is a full-day
        // continuation.
        let rects = mapper().map_week(
            &[instance(at(25, 22, 0), at(27, 2, 0))],
            container(),
            reference(),
        );
        assert_eq!(rects.len(), 3);
        let (_, wednesday) = &rects[1];
        assert!(!wednesday.show_top_anchor);
        assert!(!wednesday.show_bottom_anchor);
        assert!((wednesday.y - 0.0).abs() < f64::EPSILON);
        assert!((wednesday.height - 1440.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_instance_before_week_clips_to_monday() {
        let rects = mapper().map_week(
            &[instance(at(22, 10, 0), at(24, 9, 0))],
            container(),
            reference(),
        );
        let (_, rect) = &rects[0];
        // Renders in Monday's column from 00:00.
        assert!((rect.x - 1.0).abs() < f64::EPSILON);
        assert!((rect.y - 0.0).abs() < f64::EPSILON);
        assert!(!rect.show_top_anchor);
        assert!(rect.show_bottom_anchor);
    }

    #[test]
    fn test_instances_outside_week_are_skipped() {
        let rects = mapper().map_week(
            &[
                instance(at(1, 9, 0), at(1, 10, 0)),
                instance(at(26, 9, 0), at(26, 9, 0)),
            ],
            container(),
            reference(),
        );
        assert!(rects.is_empty());
    }
}
