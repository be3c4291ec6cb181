//! Memoization of recurrence expansions.
//!
//! Keyed by item identity, window, anchor, and structural digests of
//! the rule and exception list, so equal logical inputs share an entry
//! no matter how the caller's collections were built. A miss first
//! looks for a cached broader window for the same item/rule and derives
//! the answer by filtering it; this must be unobservable in results
//! (cache transparency).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use koyomi_core::event::EventId;
use koyomi_core::rule::RecurrenceRule;
use koyomi_core::window::Window;

use crate::expand::expand;

/// Identity of one memoized expansion.
///
/// Two keys with field-for-field equal values are equal and hash
/// equal regardless of the reference identity of the underlying
/// collections; empty and absent exception lists are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub event_id: EventId,
    pub window: Window,
    pub anchor: NaiveDateTime,
    pub rule_digest: u64,
    pub exceptions_digest: u64,
}

impl CacheKey {
    #[must_use]
    pub fn new(
        event_id: EventId,
        window: Window,
        anchor: NaiveDateTime,
        rule: &RecurrenceRule,
        exceptions: &[NaiveDate],
    ) -> Self {
        Self {
            event_id,
            window,
            anchor,
            rule_digest: digest_rule(rule),
            exceptions_digest: digest_exceptions(exceptions),
        }
    }

    /// Returns true if `other` describes the same item, rule, and
    /// exception content, ignoring the window.
    #[must_use]
    fn same_inputs(&self, other: &Self) -> bool {
        self.event_id == other.event_id
            && self.anchor == other.anchor
            && self.rule_digest == other.rule_digest
            && self.exceptions_digest == other.exceptions_digest
    }
}

/// Structural digest of a rule's fields.
fn digest_rule(rule: &RecurrenceRule) -> u64 {
    let mut hasher = DefaultHasher::new();
    rule.hash(&mut hasher);
    hasher.finish()
}

/// Order-independent digest of the exception dates. Duplicates are
/// collapsed and the empty list digests like an absent one.
fn digest_exceptions(exceptions: &[NaiveDate]) -> u64 {
    let mut sorted = exceptions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let mut hasher = DefaultHasher::new();
    sorted.hash(&mut hasher);
    hasher.finish()
}

/// Concurrent memoization store for recurrence expansions.
///
/// Lookups and inserts are atomic per key; concurrent callers racing on
/// the same key both succeed and, by cache transparency, agree on the
/// result. No eviction happens here; the embedder invalidates
/// explicitly when an item's rule or span changes.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    entries: DashMap<CacheKey, Arc<[NaiveDateTime]>>,
}

impl ExpansionCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// ## Summary
    /// Returns the occurrences for the given inputs, serving from the
    /// cache when possible.
    ///
    /// Resolution order: exact-key hit; then the tightest cached window
    /// covering the requested one for the same item/rule content,
    /// filtered down; then a fresh expansion. The result is inserted
    /// under the requested key either way.
    #[must_use]
    pub fn get_or_expand(
        &self,
        event_id: EventId,
        rule: &RecurrenceRule,
        anchor: NaiveDateTime,
        window: Window,
        exceptions: &[NaiveDate],
    ) -> Arc<[NaiveDateTime]> {
        let key = CacheKey::new(event_id, window, anchor, rule, exceptions);

        if let Some(hit) = self.entries.get(&key) {
            tracing::trace!(%event_id, from = %window.from(), to = %window.to(), "expansion cache hit");
            return Arc::clone(hit.value());
        }

        let occurrences: Arc<[NaiveDateTime]> =
            if let Some(covering) = self.find_covering(&key) {
                tracing::debug!(
                    %event_id,
                    from = %window.from(),
                    to = %window.to(),
                    "deriving expansion from a broader cached window"
                );
                covering
                    .iter()
                    .copied()
                    .filter(|occurrence| window.contains(*occurrence))
                    .collect()
            } else {
                tracing::debug!(
                    %event_id,
                    from = %window.from(),
                    to = %window.to(),
                    "expansion cache miss, expanding"
                );
                expand(rule, anchor, window, exceptions).into()
            };

        // Entry-level insert: if another caller beat us to this key the
        // first value wins, and both values are identical by cache
        // transparency.
        Arc::clone(self.entries.entry(key).or_insert(occurrences).value())
    }

    /// Finds the cached entry with the same item/rule content whose
    /// window covers the requested one. Smallest span wins; ties break
    /// on the earliest window start so the choice is deterministic.
    fn find_covering(&self, key: &CacheKey) -> Option<Arc<[NaiveDateTime]>> {
        let mut best: Option<(Window, Arc<[NaiveDateTime]>)> = None;
        for entry in &self.entries {
            let candidate = entry.key();
            if !candidate.same_inputs(key) || !candidate.window.covers(&key.window) {
                continue;
            }
            let tighter = best.as_ref().is_none_or(|(best_window, _)| {
                (candidate.window.span(), candidate.window.from())
                    < (best_window.span(), best_window.from())
            });
            if tighter {
                best = Some((candidate.window, Arc::clone(entry.value())));
            }
        }
        best.map(|(_, occurrences)| occurrences)
    }

    /// ## Summary
    /// Removes every entry whose key satisfies the predicate, returning
    /// the number removed.
    #[must_use]
    pub fn invalidate_matching(&self, predicate: impl Fn(&CacheKey) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        before - self.entries.len()
    }

    /// Drops all cached expansions for one item, e.g. after a
    /// drag/resize mutated its span or rule.
    #[must_use]
    pub fn invalidate_event(&self, event_id: EventId) -> usize {
        let removed = self.invalidate_matching(|key| key.event_id == event_id);
        tracing::trace!(%event_id, removed, "invalidated cached expansions");
        removed
    }
}
