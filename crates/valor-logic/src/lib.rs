//! Pure achievement logic for Valor.
//!
//! This crate contains everything the achievement engine needs to decide
//! whether a decoration has been earned, independent of any host engine,
//! storage, or UI. Functions take plain data and return results, making
//! them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`body`] | Celestial-body capability catalog (surface, atmosphere, moons) |
//! | [`rules`] | The full achievement rule set and its predicate checks |
//! | [`snapshot`] | Vessel state snapshots and discrete event reports |
//! | [`stats`] | Per-crew-member cumulative statistics and stat updates |

pub mod body;
pub mod rules;
pub mod snapshot;
pub mod stats;
