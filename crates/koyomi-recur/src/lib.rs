//! Recurrence expansion for the koyomi scheduler core.
//!
//! Turns a compact repeat rule plus exception dates into concrete,
//! window-bounded occurrence instants, and memoizes expansions in a
//! concurrent cache that can serve narrower windows from broader cached
//! ones.

pub mod cache;
pub mod error;
pub mod expand;
