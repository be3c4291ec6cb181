//! Scheduler items and their concrete occurrences.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rule::RecurrenceRule;

/// Identity of a scheduler item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A scheduler item as supplied by the embedding UI.
///
/// `start`/`end` are not validated here: the UI may hand over inverted
/// or degenerate spans mid-drag, and the layout engine treats those as
/// zero-length. Exception dates are date-only; an occurrence whose date
/// matches any of them is suppressed during expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub exceptions: Vec<NaiveDate>,
    /// Opaque caller data, carried through untouched.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    /// Creates a non-recurring event with an empty payload.
    #[must_use]
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: EventId::new(),
            title: title.into(),
            start,
            end,
            recurrence: None,
            exceptions: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    /// Span of the event; negative for inverted inputs.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// One concrete occurrence of an event inside a window.
///
/// Non-recurring events yield a single instance equal to their own
/// span; recurring events yield one instance per expanded occurrence,
/// each carrying the event's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    pub event_id: EventId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Instance {
    /// Builds the instance for one occurrence start, inheriting the
    /// event's duration.
    #[must_use]
    pub fn for_occurrence(event: &Event, occurrence: NaiveDateTime) -> Self {
        Self {
            event_id: event.id,
            start: occurrence,
            end: occurrence + event.duration(),
        }
    }

    /// Half-open overlap test. Degenerate spans (end <= start) are
    /// empty intervals and overlap nothing, including themselves.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < self.end
            && other.start < other.end
            && self.start < other.end
            && other.start < self.end
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }
}

impl From<&Event> for Instance {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id,
            start: event.start,
            end: event.end,
        }
    }
}
