//! Recurrence rule model.
//!
//! `Frequency` is a closed enum carrying only the fields that are
//! meaningful for its variant: a weekday set exists only on `Weekly`, a
//! month set only on `Yearly`. Structural equality and hashing are
//! derived, so two rules with field-for-field equal values compare and
//! hash identically regardless of how they were built.

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Set of weekdays stored as a bitmask (bit 0 = Monday .. bit 6 = Sunday).
///
/// Order-independent by construction: inserting days in any order yields
/// the same value. Iteration always runs Monday through Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set. An empty set on a weekly rule means "the anchor's
    /// own weekday".
    pub const EMPTY: Self = Self(0);

    /// Creates a set containing a single weekday.
    #[must_use]
    pub fn single(day: Weekday) -> Self {
        Self::EMPTY.with(day)
    }

    /// Returns a copy of the set with `day` added.
    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.num_days_from_monday()))
    }

    /// Returns true if `day` is in the set.
    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained weekdays in Monday-to-Sunday order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        const WEEK: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Set of calendar months (1-12) stored as a bitmask.
///
/// Out-of-range month numbers are ignored on insertion. An empty set on
/// a yearly rule means "the anchor's own month".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSet(u16);

impl MonthSet {
    pub const EMPTY: Self = Self(0);

    /// Returns a copy of the set with `month` (1-12) added.
    #[must_use]
    pub fn with(self, month: u32) -> Self {
        if (1..=12).contains(&month) {
            Self(self.0 | (1 << (month - 1)))
        } else {
            self
        }
    }

    /// Returns true if `month` (1-12) is in the set.
    #[must_use]
    pub fn contains(self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0 & (1 << (month - 1)) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained month numbers in January-to-December order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (1..=12).filter(move |month| self.contains(*month))
    }
}

impl FromIterator<u32> for MonthSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Recurrence frequency with frequency-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Frequency {
    /// Every `interval` days.
    Daily,
    /// The listed weekdays of every `interval`-th week. An empty set
    /// falls back to the anchor's weekday.
    Weekly { days: WeekdaySet },
    /// One day of every `interval`-th month. `None` falls back to the
    /// anchor's day-of-month; out-of-range days clamp to the month's
    /// last day.
    Monthly { day_of_month: Option<u8> },
    /// The listed months of every `interval`-th year, on the anchor's
    /// day-of-month. An empty set falls back to the anchor's month.
    Yearly { months: MonthSet },
}

impl Frequency {
    /// Returns the frequency name, for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly { .. } => "weekly",
            Self::Monthly { .. } => "monthly",
            Self::Yearly { .. } => "yearly",
        }
    }
}

/// A compact repeat rule, relative to an anchor instant supplied at
/// expansion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Period multiplier, >= 1. A zero is treated as 1 at expansion.
    pub interval: u32,
    /// Inclusive end of the rule's lifetime.
    pub until: Option<NaiveDateTime>,
    /// Lifetime cap on generated occurrences, counted from the anchor
    /// (not per expansion window).
    pub count: Option<u32>,
}

impl RecurrenceRule {
    /// Creates a rule with interval 1 and no lifetime bounds.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            until: None,
            count: None,
        }
    }

    /// Interval with the zero-leniency applied.
    #[must_use]
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }
}
