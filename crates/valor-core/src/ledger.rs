//! The hall of fame: one ledger entry per crew member.
//!
//! Entries record awarded ribbon codes, cumulative statistics, visited
//! bodies, tour flags, and a logbook. Awards are idempotent; a second award
//! of the same code is a no-op. The entry map sits behind a read-write lock
//! so the host can query from render code while a single writer feeds state
//! changes in.
//!
//! Awards for celestial ribbon families also mark the body as visited, and
//! completing the visitation set awards the matching tour ribbon exactly
//! once, inside the same award call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use valor_logic::body::BodyCatalog;
use valor_logic::stats::{CrewStats, StatUpdate};

use crate::logbook::LogbookEntry;
use crate::pool::RibbonPool;
use crate::ribbon::Ribbon;

/// Emitted once per fresh award, for the host's notification UI.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardNotice {
    pub crew_name: String,
    pub code: String,
    pub ribbon_name: String,
    pub universal_time: f64,
    pub first: bool,
}

/// One crew member's ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HallOfFameEntry {
    pub name: String,
    ribbons: BTreeSet<String>,
    pub stats: CrewStats,
    visited: BTreeSet<String>,
    grand_tour: bool,
    moons_tour: bool,
    logbook: Vec<LogbookEntry>,
    prestige: i64,
}

impl HallOfFameEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Award a ribbon. Returns true only when the ribbon is new to this
    /// entry; repeated awards change nothing.
    pub fn award(&mut self, ribbon: &Ribbon, universal_time: f64) -> bool {
        let code = ribbon.code();
        if !self.ribbons.insert(code.clone()) {
            return false;
        }
        self.prestige += i64::from(ribbon.prestige());
        self.logbook.push(LogbookEntry::new(
            universal_time,
            &code,
            &self.name,
            ribbon.name(),
        ));
        log::info!("ribbon '{}' awarded to {}", ribbon.name(), self.name);
        true
    }

    pub fn has_ribbon(&self, code: &str) -> bool {
        self.ribbons.contains(code)
    }

    /// Take a ribbon back. Prestige follows it out; the logbook keeps its
    /// history and visited bodies stay visited.
    pub fn revoke(&mut self, ribbon: &Ribbon) -> bool {
        if self.ribbons.remove(&ribbon.code()) {
            self.prestige -= i64::from(ribbon.prestige());
            log::info!("ribbon '{}' revoked from {}", ribbon.name(), self.name);
            true
        } else {
            false
        }
    }

    pub fn ribbon_codes(&self) -> impl Iterator<Item = &str> {
        self.ribbons.iter().map(String::as_str)
    }

    pub fn ribbon_count(&self) -> usize {
        self.ribbons.len()
    }

    /// Summed prestige of every awarded ribbon.
    pub fn prestige(&self) -> i64 {
        self.prestige
    }

    /// Mark a body as visited; true when it is a new one.
    pub fn visit(&mut self, body: &str) -> bool {
        self.visited.insert(body.to_string())
    }

    pub fn visited_bodies(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn grand_tour(&self) -> bool {
        self.grand_tour
    }

    pub fn moons_tour(&self) -> bool {
        self.moons_tour
    }

    pub fn logbook(&self) -> &[LogbookEntry] {
        &self.logbook
    }

    pub fn log(&mut self, entry: LogbookEntry) {
        self.logbook.push(entry);
    }

    /// Awarded ribbons resolved against the pool and filtered for display:
    /// a ribbon superseded by another awarded ribbon is hidden, the rest
    /// sort by prestige descending.
    pub fn display_ribbons<'a>(&self, pool: &'a RibbonPool) -> Vec<&'a Ribbon> {
        let superseded: BTreeSet<&str> = self
            .ribbons
            .iter()
            .filter_map(|code| pool.get(code))
            .filter_map(Ribbon::supersedes)
            .collect();
        let mut shown: Vec<&Ribbon> = self
            .ribbons
            .iter()
            .filter(|code| !superseded.contains(code.as_str()))
            .filter_map(|code| pool.get(code))
            .collect();
        shown.sort();
        shown
    }

    pub(crate) fn restore(
        name: String,
        ribbons: BTreeSet<String>,
        stats: CrewStats,
        visited: BTreeSet<String>,
        grand_tour: bool,
        moons_tour: bool,
        logbook: Vec<LogbookEntry>,
        prestige: i64,
    ) -> Self {
        Self {
            name,
            ribbons,
            stats,
            visited,
            grand_tour,
            moons_tour,
            logbook,
            prestige,
        }
    }
}

/// The ledger of all crew members.
#[derive(Default)]
pub struct HallOfFame {
    entries: RwLock<BTreeMap<String, HallOfFameEntry>>,
    batch_depth: AtomicU32,
    notices: Mutex<Vec<AwardNotice>>,
}

impl HallOfFame {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Awarding
    // ========================================================================

    /// Award a ribbon to a crew member, creating the entry on first sight.
    /// Handles visitation bookkeeping and tour awards; returns true when
    /// the award was fresh.
    pub fn award_ribbon(
        &self,
        crew_name: &str,
        ribbon: &Ribbon,
        universal_time: f64,
        pool: &RibbonPool,
        catalog: &BodyCatalog,
    ) -> bool {
        let mut entries = self.write_entries();
        let entry = entries
            .entry(crew_name.to_string())
            .or_insert_with(|| HallOfFameEntry::new(crew_name));

        let fresh = entry.award(ribbon, universal_time);
        if fresh {
            self.push_notice(entry, ribbon, universal_time);
        }

        // qualifying celestial checks accumulate visitation even when the
        // ribbon itself was already awarded
        if let Some(body) = ribbon.achievement().visited_body() {
            if entry.visit(body) {
                Self::check_tours(entry, universal_time, pool, catalog, |e, r, ut| {
                    self.push_notice(e, r, ut)
                });
            }
        }
        fresh
    }

    /// Tour checks run after every new visitation. Each tour fires at most
    /// once per entry; the flag is set even when the pool carries no tour
    /// ribbon so it cannot re-fire later.
    fn check_tours(
        entry: &mut HallOfFameEntry,
        universal_time: f64,
        pool: &RibbonPool,
        catalog: &BodyCatalog,
        mut notify: impl FnMut(&HallOfFameEntry, &Ribbon, f64),
    ) {
        if !entry.grand_tour {
            let all_visited = catalog
                .non_sun_names()
                .iter()
                .all(|body| entry.visited.contains(*body));
            if all_visited {
                entry.grand_tour = true;
                if let Some(ribbon) = pool.get("GT") {
                    if entry.award(ribbon, universal_time) {
                        notify(entry, ribbon, universal_time);
                    }
                }
            }
        }
        if !entry.moons_tour {
            if let Some(giant) = catalog.gas_giant() {
                let moons: Vec<_> = catalog.moons_of(&giant.name).collect();
                let all_visited = !moons.is_empty()
                    && moons.iter().all(|moon| entry.visited.contains(&moon.name));
                if all_visited {
                    entry.moons_tour = true;
                    if let Some(ribbon) = pool.get("JT") {
                        if entry.award(ribbon, universal_time) {
                            notify(entry, ribbon, universal_time);
                        }
                    }
                }
            }
        }
    }

    // ========================================================================
    // Statistics and logbook
    // ========================================================================

    /// Apply a statistics update to a crew member, creating the entry on
    /// first sight.
    pub fn record_stat_update(&self, crew_name: &str, update: &StatUpdate) {
        let mut entries = self.write_entries();
        entries
            .entry(crew_name.to_string())
            .or_insert_with(|| HallOfFameEntry::new(crew_name))
            .stats
            .apply(update);
    }

    pub fn log(&self, crew_name: &str, entry: LogbookEntry) {
        let mut entries = self.write_entries();
        entries
            .entry(crew_name.to_string())
            .or_insert_with(|| HallOfFameEntry::new(crew_name))
            .log(entry);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn has_ribbon(&self, crew_name: &str, code: &str) -> bool {
        self.read_entries()
            .get(crew_name)
            .is_some_and(|entry| entry.has_ribbon(code))
    }

    /// Whether any crew member holds the ribbon. Gates the first-achiever
    /// variants.
    pub fn any_has_ribbon(&self, code: &str) -> bool {
        self.read_entries()
            .values()
            .any(|entry| entry.has_ribbon(code))
    }

    pub fn entry_count(&self) -> usize {
        self.read_entries().len()
    }

    /// Run a closure against a crew member's entry, if present.
    pub fn with_entry<T>(
        &self,
        crew_name: &str,
        f: impl FnOnce(&HallOfFameEntry) -> T,
    ) -> Option<T> {
        self.read_entries().get(crew_name).map(f)
    }

    /// Same as [`with_entry`](Self::with_entry) with mutable access.
    pub fn with_entry_mut<T>(
        &self,
        crew_name: &str,
        f: impl FnOnce(&mut HallOfFameEntry) -> T,
    ) -> Option<T> {
        self.write_entries().get_mut(crew_name).map(f)
    }

    /// Stats snapshot for a crew member, default when unknown.
    pub fn stats_of(&self, crew_name: &str) -> CrewStats {
        self.read_entries()
            .get(crew_name)
            .map(|entry| entry.stats.clone())
            .unwrap_or_default()
    }

    /// All crew ranked by summed prestige descending, name as tie-break.
    pub fn ranking(&self) -> Vec<(String, i64)> {
        let entries = self.read_entries();
        let mut ranked: Vec<(String, i64)> = entries
            .values()
            .map(|entry| (entry.name.clone(), entry.prestige()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Clone of every entry, for persistence and UI listings.
    pub fn snapshot(&self) -> Vec<HallOfFameEntry> {
        self.read_entries().values().cloned().collect()
    }

    /// Replace the whole ledger, used by load and revert.
    pub fn replace(&self, entries: Vec<HallOfFameEntry>) {
        let mut map = self.write_entries();
        map.clear();
        for entry in entries {
            map.insert(entry.name.clone(), entry);
        }
    }

    // ========================================================================
    // Batch mode and notifications
    // ========================================================================

    /// Enter batch mode: per-award notices are suppressed until the matching
    /// [`end_batch`](Self::end_batch). Ledger and logbook updates are not
    /// affected.
    pub fn begin_batch(&self) {
        self.batch_depth.fetch_add(1, Ordering::SeqCst);
    }

    pub fn end_batch(&self) {
        let previous = self.batch_depth.fetch_sub(1, Ordering::SeqCst);
        if previous == 0 {
            // unbalanced call, clamp back
            self.batch_depth.store(0, Ordering::SeqCst);
            log::warn!("end_batch without begin_batch");
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth.load(Ordering::SeqCst) > 0
    }

    /// Drain pending award notices.
    pub fn take_notices(&self) -> Vec<AwardNotice> {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *notices)
    }

    fn push_notice(&self, entry: &HallOfFameEntry, ribbon: &Ribbon, universal_time: f64) {
        if self.in_batch() {
            return;
        }
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.push(AwardNotice {
            crew_name: entry.name.clone(),
            code: ribbon.code(),
            ribbon_name: ribbon.name(),
            universal_time,
            first: ribbon.achievement().first(),
        });
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, HallOfFameEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, HallOfFameEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
