//! The achievement engine: the one object the host talks to.
//!
//! Construction wires the catalog, activity registry, ribbon pool, and hall
//! of fame together in that order; nothing here is global. Setup is staged:
//! build, optionally scan ribbon packs, apply the user config, then
//! [`complete_setup`](AchievementEngine::complete_setup). Until setup
//! completes every inbound call is a recorded no-op for awards, so the host
//! can start feeding state early without racing pack installation.

use std::io::{Read, Write};
use std::path::Path;

use valor_logic::body::BodyCatalog;
use valor_logic::snapshot::{EventReport, VesselSnapshot};
use valor_logic::stats::StatUpdate;

use crate::activity::ActivityRegistry;
use crate::config::EngineConfig;
use crate::ledger::HallOfFame;
use crate::pack::{self, RibbonPack};
use crate::persistence::{self, SaveError};
use crate::pool::RibbonPool;

pub struct AchievementEngine {
    catalog: BodyCatalog,
    activities: ActivityRegistry,
    pool: RibbonPool,
    hall_of_fame: HallOfFame,
    config: EngineConfig,
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEngine {
    /// Engine over the default solar system.
    pub fn new() -> Self {
        Self::with_catalog(BodyCatalog::default_system())
    }

    pub fn with_catalog(catalog: BodyCatalog) -> Self {
        let mut activities = ActivityRegistry::new();
        let mut pool = RibbonPool::new();
        pool.create_builtins(&mut activities, &catalog);
        Self {
            catalog,
            activities,
            pool,
            hall_of_fame: HallOfFame::new(),
            config: EngineConfig::default(),
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Scan a directory tree for ribbon packs and install every ribbon
    /// found. Returns the number of installed ribbons.
    pub fn scan_ribbon_packs(&mut self, dir: &Path) -> usize {
        let mut installed = 0;
        for path in pack::find_packs(dir) {
            match RibbonPack::load(&path) {
                Ok(pack) => {
                    installed += pack.install(&mut self.pool, &mut self.activities);
                }
                Err(e) => {
                    log::error!("ribbon pack {} rejected: {e}", path.display());
                }
            }
        }
        installed
    }

    /// Apply a user config: install ribbon packs from the configured
    /// directory, disable listed codes and, when first-achiever ribbons are
    /// switched off, every first variant in the pool.
    pub fn apply_config(&mut self, config: EngineConfig) {
        if let Some(dir) = &config.pack_directory {
            let installed = self.scan_ribbon_packs(dir);
            log::info!("installed {installed} ribbons from {}", dir.display());
        }
        for code in &config.disabled_codes {
            if !self.pool.set_enabled(code, false) {
                log::warn!("config disables unknown ribbon code '{code}'");
            }
        }
        if !config.award_first_ribbons {
            let first_codes: Vec<String> = self
                .pool
                .iter()
                .filter(|r| r.achievement().first())
                .map(|r| r.code())
                .collect();
            for code in first_codes {
                self.pool.set_enabled(&code, false);
            }
        }
        self.config = config;
    }

    /// Declare setup finished. The pool becomes ready and evaluation opens.
    pub fn complete_setup(&mut self) {
        self.pool.mark_ready();
    }

    fn evaluating(&self) -> bool {
        self.pool.is_ready() && self.config.enabled
    }

    // ========================================================================
    // Inbound interface
    // ========================================================================

    /// Feed one vessel state transition for a crew. `previous` is absent
    /// for a freshly tracked vessel or EVA.
    pub fn on_transition(
        &self,
        crew: &[String],
        previous: Option<&VesselSnapshot>,
        current: &VesselSnapshot,
    ) {
        if !self.evaluating() || crew.is_empty() {
            return;
        }
        for ribbon in self.pool.transition_ribbons() {
            if !ribbon
                .achievement()
                .check_transition(&self.catalog, previous, current)
            {
                continue;
            }
            // a first-achiever ribbon can be earned by one crew only, but
            // everyone aboard at that moment shares it
            if ribbon.achievement().first() && self.hall_of_fame.any_has_ribbon(&ribbon.code()) {
                continue;
            }
            for name in crew {
                self.hall_of_fame.award_ribbon(
                    name,
                    ribbon,
                    current.universal_time,
                    &self.pool,
                    &self.catalog,
                );
            }
        }
    }

    /// Feed a discrete event report.
    pub fn on_event(&self, report: &EventReport) {
        if !self.evaluating() || report.crew.is_empty() {
            return;
        }
        for ribbon in self.pool.event_ribbons() {
            if !ribbon.achievement().check_event(report) {
                continue;
            }
            if ribbon.achievement().first() && self.hall_of_fame.any_has_ribbon(&ribbon.code()) {
                continue;
            }
            for name in &report.crew {
                self.hall_of_fame.award_ribbon(
                    name,
                    ribbon,
                    report.universal_time,
                    &self.pool,
                    &self.catalog,
                );
            }
        }
    }

    /// Apply a statistics update for one crew member, then evaluate the
    /// cumulative rules against the new totals. Statistics are recorded
    /// even while the engine is disabled; only awarding is gated.
    pub fn on_stat_update(&self, crew_name: &str, update: &StatUpdate, universal_time: f64) {
        self.hall_of_fame.record_stat_update(crew_name, update);
        if !self.evaluating() {
            return;
        }
        let stats = self.hall_of_fame.stats_of(crew_name);
        for ribbon in self.pool.stat_ribbons() {
            if !ribbon.achievement().check_stats(&stats) {
                continue;
            }
            self.hall_of_fame.award_ribbon(
                crew_name,
                ribbon,
                universal_time,
                &self.pool,
                &self.catalog,
            );
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_hall_of_fame(writer, &self.hall_of_fame)
    }

    /// Load a hall of fame. A bad save empties the ledger rather than
    /// leaving stale entries behind, and the error is passed up.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        match persistence::load_hall_of_fame(reader) {
            Ok(entries) => {
                log::info!("loaded hall of fame with {} entries", entries.len());
                self.hall_of_fame.replace(entries);
                Ok(())
            }
            Err(e) => {
                log::error!("hall of fame load failed: {e}");
                self.hall_of_fame.replace(Vec::new());
                Err(e)
            }
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn activities(&self) -> &ActivityRegistry {
        &self.activities
    }

    pub fn pool(&self) -> &RibbonPool {
        &self.pool
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut RibbonPool, &mut ActivityRegistry) {
        (&mut self.pool, &mut self.activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_logic::snapshot::{Situation, VesselInfo, VesselType};

    fn snap(situation: Situation, body: &str) -> VesselSnapshot {
        VesselSnapshot {
            is_eva: false,
            situation,
            main_body: Some(body.to_string()),
            altitude: 0.0,
            atm_density: 0.0,
            apoapsis: 0.0,
            periapsis: 0.0,
            origin: Some(VesselInfo {
                total_mass: 10.0,
                vessel_type: VesselType::Ship,
                parts: Vec::new(),
                gee_force: 1.0,
                gee_force_sustained: 0.0,
                mach_horizontal: 0.0,
            }),
            flag_planted: false,
            moved_on_surface: false,
            is_launch: false,
            mission_time: 0.0,
            universal_time: 100.0,
        }
    }

    fn crew(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_awards_before_setup_completes() {
        let mut engine = AchievementEngine::new();
        let prev = snap(Situation::Escaping, "Terra");
        let cur = snap(Situation::Orbiting, "Luna");
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
        assert_eq!(engine.hall_of_fame().entry_count(), 0);

        engine.complete_setup();
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
        assert!(engine.hall_of_fame().has_ribbon("Sam", "O:Luna"));
    }

    #[test]
    fn test_first_ribbon_fires_once_campaign_wide() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        let prev = snap(Situation::Escaping, "Terra");
        let cur = snap(Situation::Orbiting, "Luna");
        engine.on_transition(&crew(&["Sam", "Alex"]), Some(&prev), &cur);
        // both aboard share the first orbit
        assert!(engine.hall_of_fame().has_ribbon("Sam", "O1:Luna"));
        assert!(engine.hall_of_fame().has_ribbon("Alex", "O1:Luna"));

        engine.on_transition(&crew(&["Zoe"]), Some(&prev), &cur);
        assert!(engine.hall_of_fame().has_ribbon("Zoe", "O:Luna"));
        assert!(!engine.hall_of_fame().has_ribbon("Zoe", "O1:Luna"));
    }

    #[test]
    fn test_disabled_engine_records_stats_but_awards_nothing() {
        let mut engine = AchievementEngine::new();
        engine.apply_config(EngineConfig {
            enabled: false,
            ..Default::default()
        });
        engine.complete_setup();
        for _ in 0..5 {
            engine.on_stat_update(
                "Sam",
                &StatUpdate::MissionCompleted { duration: 10.0 },
                100.0,
            );
        }
        let stats = engine.hall_of_fame().stats_of("Sam");
        assert_eq!(stats.missions_flown, 5);
        assert!(!engine.hall_of_fame().has_ribbon("Sam", "M:5"));
    }

    #[test]
    fn test_stat_update_awards_threshold_ribbons() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        for _ in 0..5 {
            engine.on_stat_update(
                "Sam",
                &StatUpdate::MissionCompleted { duration: 10.0 },
                100.0,
            );
        }
        assert!(engine.hall_of_fame().has_ribbon("Sam", "M:5"));
        assert!(!engine.hall_of_fame().has_ribbon("Sam", "M:20"));
    }

    #[test]
    fn test_config_disables_first_variants() {
        let mut engine = AchievementEngine::new();
        engine.apply_config(EngineConfig {
            award_first_ribbons: false,
            ..Default::default()
        });
        engine.complete_setup();
        let prev = snap(Situation::Escaping, "Terra");
        let cur = snap(Situation::Orbiting, "Luna");
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
        assert!(engine.hall_of_fame().has_ribbon("Sam", "O:Luna"));
        assert!(!engine.hall_of_fame().has_ribbon("Sam", "O1:Luna"));
    }

    #[test]
    fn test_config_pack_directory_installs_packs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::pack::PACK_FILE_NAME),
            "NAME:Expedition\nFOLDER:packs/expedition\nBASE:300\n\
             0:exp1:Expedition I:Awarded for the first expedition:60\n",
        )
        .unwrap();

        let mut engine = AchievementEngine::new();
        engine.apply_config(EngineConfig {
            pack_directory: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        engine.complete_setup();
        assert!(engine.award_ribbon_to("Sam", "X300", 5.0));
    }

    #[test]
    fn test_load_failure_empties_ledger() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        let prev = snap(Situation::Escaping, "Terra");
        let cur = snap(Situation::Orbiting, "Luna");
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
        assert_eq!(engine.hall_of_fame().entry_count(), 1);

        let garbage = b"definitely not a save file";
        assert!(engine.load(&garbage[..]).is_err());
        assert_eq!(engine.hall_of_fame().entry_count(), 0);
    }

    #[test]
    fn test_save_load_through_engine() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        let prev = snap(Situation::Escaping, "Terra");
        let cur = snap(Situation::Orbiting, "Luna");
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);

        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");

        let mut restored = AchievementEngine::new();
        restored.complete_setup();
        restored.load(&buffer[..]).expect("load failed");
        assert!(restored.hall_of_fame().has_ribbon("Sam", "O1:Luna"));
    }
}
