//! Concurrency-column assignment for overlapping instances.
//!
//! Instances are partitioned into maximal connected components of the
//! half-open "overlaps in time" relation (transitive, so A and C are
//! grouped via B even when they never touch directly), then each group
//! is swept once to assign the lowest reusable column. Every member of
//! a group is stamped with the group's peak concurrency so all of them
//! render at the same width.

use chrono::NaiveDateTime;
use koyomi_core::event::{EventId, Instance};

/// Column placement for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    pub event_id: EventId,
    /// 0-based concurrency column.
    pub column: usize,
    /// Peak number of simultaneously occupied columns in the instance's
    /// overlap group - not the number of columns this instance spans.
    pub column_count: usize,
}

/// ## Summary
/// Partitions instances into maximal overlap groups.
///
/// Returns index lists into `instances`, each sorted chronologically by
/// (start, end). Degenerate instances (end <= start) are empty
/// intervals: they overlap nothing and always form singleton groups.
#[must_use]
pub fn group_overlapping(instances: &[Instance]) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..instances.len()).collect();
    order.sort_by_key(|&index| (instances[index].start, instances[index].end));

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut reach: Option<NaiveDateTime> = None;

    for index in order {
        let instance = &instances[index];
        if instance.end <= instance.start {
            groups.push(vec![index]);
            continue;
        }
        match reach {
            // Half-open: an instance starting exactly at the group's
            // furthest end begins a new group.
            Some(end) if instance.start < end => {
                current.push(index);
                reach = Some(end.max(instance.end));
            }
            _ => {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                current.push(index);
                reach = Some(instance.end);
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// ## Summary
/// Assigns a concurrency column and a group-wide column count to every
/// instance.
///
/// The result is parallel to `instances`, preserving the caller's
/// order. Within each group the sweep reuses the lowest-indexed column
/// whose occupant has ended (stored end <= next start), otherwise opens
/// a new column; the group's `column_count` is the maximum number of
/// columns observed occupied at once during the sweep.
#[must_use]
pub fn compute_layout(instances: &[Instance]) -> Vec<SlotAssignment> {
    let mut assignments: Vec<SlotAssignment> = instances
        .iter()
        .map(|instance| SlotAssignment {
            event_id: instance.event_id,
            column: 0,
            column_count: 1,
        })
        .collect();

    for group in group_overlapping(instances) {
        // End instant of the instance currently occupying each column.
        let mut columns: Vec<NaiveDateTime> = Vec::new();
        let mut peak = 0usize;

        for &index in &group {
            let instance = &instances[index];
            let end = instance.end.max(instance.start);
            let column = match columns
                .iter()
                .position(|&occupied_until| occupied_until <= instance.start)
            {
                Some(free) => {
                    columns[free] = end;
                    free
                }
                None => {
                    columns.push(end);
                    columns.len() - 1
                }
            };
            let active = columns
                .iter()
                .filter(|&&occupied_until| occupied_until > instance.start)
                .count();
            peak = peak.max(active);
            assignments[index].column = column;
        }

        let peak = peak.max(1);
        for &index in &group {
            assignments[index].column_count = peak;
        }
    }

    assignments
}
