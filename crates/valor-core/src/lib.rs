//! Valor Core - Achievement Engine
//!
//! Watches a space program unfold and decorates its crew for it. The host
//! simulation feeds vessel state transitions, discrete events, and crew
//! statistics into the [`AchievementEngine`]; the engine evaluates the rule
//! set from `valor-logic`, awards ribbons, and keeps a persistent hall of
//! fame with a logbook per crew member.
//!
//! # Architecture
//!
//! - **Activities** (`activity`): registry of award reasons, keyed by code
//! - **Ribbons** (`ribbon`, `pool`): decorations wrapping a rule, with
//!   supersede chains; built once at startup, extended by ribbon packs
//!   (`pack`) and plugin registrations (`external`)
//! - **Hall of fame** (`ledger`, `logbook`): per-crew ledger entries with
//!   awarded ribbons, statistics, visited bodies, and a logbook
//! - **Persistence** (`persistence`): versioned binary save/load of the
//!   hall of fame
//!
//! # Example
//!
//! ```rust,no_run
//! use valor_core::prelude::*;
//!
//! let mut engine = AchievementEngine::new();
//! engine.complete_setup();
//!
//! // The host feeds state transitions as they happen
//! // engine.on_transition(&crew_names, prev.as_ref(), &current);
//! ```

pub mod activity;
pub mod config;
pub mod engine;
pub mod external;
pub mod ledger;
pub mod logbook;
pub mod pack;
pub mod persistence;
pub mod pool;
pub mod ribbon;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::AchievementEngine;
    pub use crate::ledger::{HallOfFame, HallOfFameEntry};
    pub use crate::pool::RibbonPool;
    pub use crate::ribbon::Ribbon;
    pub use valor_logic::body::BodyCatalog;
    pub use valor_logic::rules::{Achievement, AchievementKind};
    pub use valor_logic::snapshot::{EventKind, EventReport, Situation, VesselSnapshot};
    pub use valor_logic::stats::{CrewStats, Specialization, StatUpdate};
}
