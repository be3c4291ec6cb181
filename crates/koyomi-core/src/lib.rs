//! Koyomi scheduler widget core - shared data model.
//!
//! Items, recurrence rules, windows, and the geometry types exchanged
//! between the recurrence engine, the slot layout engine, and the
//! position mappers. All instants are timezone-naive: the embedding UI
//! resolves timezones before anything reaches this workspace.

pub mod error;
pub mod event;
pub mod geometry;
pub mod rule;
pub mod view;
pub mod window;
