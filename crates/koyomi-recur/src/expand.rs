//! Window-bounded expansion of recurrence rules.
//!
//! Every generator walks candidate instants in chronological order from
//! the anchor, inheriting the anchor's time-of-day, and stops at the
//! first of: window end reached, `until` exceeded, or the lifetime
//! `count` consumed. Occurrences before the window start are generated
//! (they consume `count`) but not emitted; candidates before the anchor
//! itself are skipped entirely.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use koyomi_core::rule::{Frequency, MonthSet, RecurrenceRule, WeekdaySet};
use koyomi_core::window::Window;

use crate::error::RecurResult;

/// ## Summary
/// Expands a recurrence rule into the chronological, duplicate-free
/// sequence of occurrence instants inside `[window.from, window.to)`.
///
/// An occurrence whose calendar date equals any exception date is
/// suppressed, regardless of the occurrence's time-of-day. The
/// exception list may be unordered and may contain duplicates.
#[must_use]
pub fn expand(
    rule: &RecurrenceRule,
    anchor: NaiveDateTime,
    window: Window,
    exceptions: &[NaiveDate],
) -> Vec<NaiveDateTime> {
    tracing::trace!(
        frequency = rule.frequency.as_str(),
        interval = rule.effective_interval(),
        %anchor,
        from = %window.from(),
        to = %window.to(),
        exception_count = exceptions.len(),
        "expanding recurrence rule"
    );

    let exceptions: BTreeSet<NaiveDate> = exceptions.iter().copied().collect();
    let mut emitter = Emitter::new(rule, window, &exceptions);

    match rule.frequency {
        Frequency::Daily => expand_daily(rule, anchor, &mut emitter),
        Frequency::Weekly { days } => expand_weekly(rule, days, anchor, &mut emitter),
        Frequency::Monthly { day_of_month } => {
            expand_monthly(rule, day_of_month, anchor, &mut emitter);
        }
        Frequency::Yearly { months } => expand_yearly(rule, months, anchor, &mut emitter),
    }

    emitter.into_occurrences()
}

/// ## Summary
/// Convenience entry taking raw window bounds, validating them first.
///
/// ## Errors
/// Returns an error if `from > to`.
pub fn expand_between(
    rule: &RecurrenceRule,
    anchor: NaiveDateTime,
    from: NaiveDateTime,
    to: NaiveDateTime,
    exceptions: &[NaiveDate],
) -> RecurResult<Vec<NaiveDateTime>> {
    let window = Window::new(from, to)?;
    Ok(expand(rule, anchor, window, exceptions))
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Done,
}

/// Shared termination and filtering for the per-frequency generators.
/// Candidates must be fed in chronological order.
struct Emitter<'a> {
    window: Window,
    until: Option<NaiveDateTime>,
    count: Option<u32>,
    generated: u32,
    exceptions: &'a BTreeSet<NaiveDate>,
    occurrences: Vec<NaiveDateTime>,
}

impl<'a> Emitter<'a> {
    fn new(rule: &RecurrenceRule, window: Window, exceptions: &'a BTreeSet<NaiveDate>) -> Self {
        Self {
            window,
            until: rule.until,
            count: rule.count,
            generated: 0,
            exceptions,
            occurrences: Vec::new(),
        }
    }

    /// Feeds the next candidate. `Done` means no later candidate can be
    /// emitted either, so the generator must stop.
    fn push(&mut self, candidate: NaiveDateTime) -> Step {
        if self.until.is_some_and(|until| candidate > until) {
            return Step::Done;
        }
        if candidate >= self.window.to() {
            return Step::Done;
        }
        if self.count.is_some_and(|count| self.generated >= count) {
            return Step::Done;
        }
        // The candidate is generated even when it precedes the window:
        // `count` is a lifetime cap measured from the anchor. Exceptions
        // filter after generation, so a suppressed occurrence still
        // consumes the cap.
        self.generated += 1;
        if self.window.contains(candidate)
            && !self.exceptions.contains(&candidate.date())
            && self.occurrences.last() != Some(&candidate)
        {
            self.occurrences.push(candidate);
        }
        Step::Continue
    }

    fn into_occurrences(self) -> Vec<NaiveDateTime> {
        self.occurrences
    }
}

fn expand_daily(rule: &RecurrenceRule, anchor: NaiveDateTime, emitter: &mut Emitter<'_>) {
    let interval = i64::from(rule.effective_interval());
    let mut candidate = anchor;

    // Without a lifetime cap, skipped pre-window occurrences are
    // unobservable, so jump straight to the window.
    if rule.count.is_none() && emitter.window.from() > anchor {
        let days_ahead = (emitter.window.from() - anchor).num_days();
        let steps = days_ahead / interval;
        if let Some(skipped) = anchor.checked_add_signed(TimeDelta::days(steps * interval)) {
            candidate = skipped;
        }
    }

    while emitter.push(candidate) == Step::Continue {
        let Some(next) = candidate.checked_add_signed(TimeDelta::days(interval)) else {
            return;
        };
        candidate = next;
    }
}

fn expand_weekly(
    rule: &RecurrenceRule,
    days: WeekdaySet,
    anchor: NaiveDateTime,
    emitter: &mut Emitter<'_>,
) {
    let days = if days.is_empty() {
        WeekdaySet::single(anchor.weekday())
    } else {
        days
    };
    let interval = i64::from(rule.effective_interval());
    let time = anchor.time();
    let anchor_monday =
        anchor.date() - TimeDelta::days(i64::from(anchor.weekday().num_days_from_monday()));

    let mut week_start = anchor_monday;
    if rule.count.is_none() && emitter.window.from() > anchor {
        let weeks_ahead = (emitter.window.from().date() - anchor_monday).num_days() / 7;
        let blocks = (weeks_ahead / interval - 1).max(0);
        if let Some(skipped) = anchor_monday.checked_add_signed(TimeDelta::days(blocks * interval * 7))
        {
            week_start = skipped;
        }
    }

    loop {
        for day in days.iter() {
            let Some(date) = week_start
                .checked_add_signed(TimeDelta::days(i64::from(day.num_days_from_monday())))
            else {
                return;
            };
            let candidate = date.and_time(time);
            if candidate < anchor {
                // The anchor week can contain listed days before the
                // anchor itself; a rule's first occurrence is its anchor.
                continue;
            }
            if emitter.push(candidate) == Step::Done {
                return;
            }
        }
        let Some(next) = week_start.checked_add_signed(TimeDelta::days(interval * 7)) else {
            return;
        };
        week_start = next;
    }
}

fn expand_monthly(
    rule: &RecurrenceRule,
    day_of_month: Option<u8>,
    anchor: NaiveDateTime,
    emitter: &mut Emitter<'_>,
) {
    let interval = i32::try_from(rule.effective_interval()).unwrap_or(i32::MAX);
    let target_day = day_of_month.map_or_else(|| anchor.day(), u32::from);
    let time = anchor.time();
    let base = anchor.year() * 12 + i32::try_from(anchor.month0()).unwrap_or(0);

    let mut step = 0i32;
    if rule.count.is_none() && emitter.window.from() > anchor {
        let from = emitter.window.from();
        let months_ahead =
            from.year() * 12 + i32::try_from(from.month0()).unwrap_or(0) - base;
        step = (months_ahead / interval - 1).max(0);
    }

    loop {
        let Some(total) = step.checked_mul(interval).and_then(|m| base.checked_add(m)) else {
            return;
        };
        let year = total.div_euclid(12);
        let month = u32::try_from(total.rem_euclid(12)).unwrap_or(0) + 1;
        // Clamp instead of skipping the month: the 31st recurs on
        // Feb 28/29 and on the 30th of 30-day months.
        let day = target_day.min(days_in_month(year, month));
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return;
        };
        let candidate = date.and_time(time);
        if candidate >= anchor && emitter.push(candidate) == Step::Done {
            return;
        }
        step += 1;
    }
}

fn expand_yearly(
    rule: &RecurrenceRule,
    months: MonthSet,
    anchor: NaiveDateTime,
    emitter: &mut Emitter<'_>,
) {
    let months = if months.is_empty() {
        MonthSet::EMPTY.with(anchor.month())
    } else {
        months
    };
    let interval = i32::try_from(rule.effective_interval()).unwrap_or(i32::MAX);
    let day_of_month = anchor.day();
    let time = anchor.time();

    let mut year = anchor.year();
    if rule.count.is_none() && emitter.window.from() > anchor {
        let years_ahead = emitter.window.from().year() - anchor.year();
        let blocks = (years_ahead / interval - 1).max(0);
        year = year.saturating_add(blocks.saturating_mul(interval));
    }

    loop {
        for month in months.iter() {
            let day = day_of_month.min(days_in_month(year, month));
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                return;
            };
            let candidate = date.and_time(time);
            if candidate < anchor {
                continue;
            }
            if emitter.push(candidate) == Step::Done {
                return;
            }
        }
        let Some(next) = year.checked_add(interval) else {
            return;
        };
        year = next;
    }
}

/// Number of days in a calendar month, leap years included.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}
