//! The ribbon pool: every awardable ribbon, keyed by code.
//!
//! The pool is built once at startup from the body catalog, then optionally
//! extended by ribbon packs and plugin registrations. Registration enforces
//! two pool invariants: codes are unique (first registration wins) and
//! supersede references never form a cycle. Once the host signals that setup
//! is complete the pool is marked ready and queued ready callbacks fire;
//! evaluation is gated on readiness.

use std::collections::BTreeMap;

use valor_logic::body::{BodyCatalog, BodyInfo};
use valor_logic::rules::{Achievement, AchievementKind};
use valor_logic::stats::Specialization;

use crate::activity::{Activity, ActivityRegistry};
use crate::ribbon::Ribbon;

/// Custom ribbon indices below this are reserved for the built-in slots and
/// ribbon packs; plugins must register at or above it.
pub const CUSTOM_RIBBON_BASE: u32 = 1000;

/// Built-in generic custom slots, awardable by the host for any reason.
const CUSTOM_SLOTS: std::ops::Range<u32> = 100..120;

// Tier tables for the threshold families. Each chain supersedes upward.
const MISSION_COUNT_TIERS: &[(u32, i32)] = &[(5, 56), (20, 57), (50, 58), (100, 59), (200, 60)];
const MISSION_TIME_DAYS: &[(u32, i32)] = &[
    (5, 4901),
    (20, 4902),
    (50, 4903),
    (100, 4904),
    (500, 4905),
    (2000, 4906),
    (5000, 4907),
];
const ENDURANCE_DAYS: &[(u32, i32)] = &[(20, 4921), (50, 4922), (125, 4923), (500, 4924), (2000, 4925)];
const FAST_ORBIT_SECONDS: &[(u32, i32)] = &[(250, 3101), (200, 3102), (150, 3103), (120, 3104)];
const HEAVY_MASS_TONS: &[(u32, i32)] = &[
    (250, 401),
    (500, 402),
    (750, 403),
    (1000, 404),
    (2000, 405),
    (4000, 406),
];
const SOLID_FUEL_PERCENT: &[(u32, i32)] = &[(10, 719), (20, 720), (30, 721)];
const GEE_FORCE: &[(u32, i32)] = &[
    (3, 83),
    (4, 84),
    (5, 85),
    (6, 86),
    (7, 87),
    (8, 88),
    (9, 89),
    (10, 90),
    (11, 91),
    (12, 92),
    (13, 93),
    (14, 94),
    (15, 95),
    (16, 96),
    (17, 97),
    (18, 98),
];
const MACH: &[(u32, i32)] = &[
    (1, 481),
    (2, 482),
    (3, 483),
    (4, 484),
    (5, 485),
    (6, 486),
    (7, 487),
    (8, 488),
    (9, 489),
    (10, 490),
];
const CONTRACT_TIERS: &[(u32, i32)] = &[(5, 41), (10, 42), (20, 43), (40, 44), (60, 45)];
const RESEARCH_POINTS: &[(u32, i32)] = &[
    (10, 31),
    (50, 32),
    (100, 33),
    (200, 34),
    (500, 35),
    (1000, 36),
    (2000, 37),
];
const EVA_TOTAL_SECONDS: &[(u32, i32)] = &[
    (3_600, 1801),
    (18_000, 1802),
    (36_000, 1803),
    (90_000, 1804),
    (180_000, 1805),
];
const EVA_ENDURANCE_SECONDS: &[(u32, i32)] = &[
    (1_800, 1821),
    (3_600, 1822),
    (7_200, 1823),
    (14_400, 1824),
    (21_600, 1825),
];

const SECONDS_PER_DAY: u32 = 86_400;

type ReadyCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub struct RibbonPool {
    ribbons: BTreeMap<String, Ribbon>,
    /// Custom ribbon index to pool code.
    custom_codes: BTreeMap<u32, String>,
    ready: bool,
    ready_callbacks: Vec<ReadyCallback>,
}

impl RibbonPool {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a ribbon and its activity. Refused (with a log line) when
    /// the code is already taken or the supersede reference would close a
    /// cycle; the pool is unchanged on refusal.
    pub fn register(&mut self, ribbon: Ribbon, registry: &mut ActivityRegistry) -> bool {
        let code = ribbon.code();
        if self.ribbons.contains_key(&code) {
            log::error!("ribbon code '{code}' already registered, ignoring duplicate");
            return false;
        }
        if let Some(target) = ribbon.supersedes() {
            if self.would_cycle(&code, target) {
                log::error!(
                    "ribbon '{code}' supersede reference '{target}' closes a cycle, refused"
                );
                return false;
            }
        }
        registry.register(Activity::new(&code, ribbon.name()));
        self.ribbons.insert(code, ribbon);
        true
    }

    /// Register a custom ribbon under a numeric index. The index maps to the
    /// pool code `X{index}`.
    pub fn register_custom(
        &mut self,
        index: u32,
        name: &str,
        description: &str,
        texture: &str,
        prestige: i32,
        registry: &mut ActivityRegistry,
    ) -> bool {
        let achievement = Achievement::new(
            AchievementKind::Custom {
                index,
                name: name.to_string(),
                description: description.to_string(),
            },
            prestige,
        );
        let code = achievement.code();
        if !self.register(Ribbon::new(texture, achievement), registry) {
            return false;
        }
        self.custom_codes.insert(index, code);
        true
    }

    /// Custom registration entry point for plugins; indices below
    /// [`CUSTOM_RIBBON_BASE`] are reserved.
    pub fn register_plugin_custom(
        &mut self,
        index: u32,
        name: &str,
        description: &str,
        texture: &str,
        prestige: i32,
        registry: &mut ActivityRegistry,
    ) -> bool {
        if index < CUSTOM_RIBBON_BASE {
            log::error!(
                "plugin custom ribbon index {index} is below the reserved base {CUSTOM_RIBBON_BASE}"
            );
            return false;
        }
        self.register_custom(index, name, description, texture, prestige, registry)
    }

    /// Whether adding `code` superseding `target` would close a cycle.
    fn would_cycle(&self, code: &str, target: &str) -> bool {
        let mut cursor = target.to_string();
        // the walk is bounded by the pool size, chains are short in practice
        for _ in 0..=self.ribbons.len() {
            if cursor == code {
                return true;
            }
            match self.ribbons.get(&cursor).and_then(Ribbon::supersedes) {
                Some(next) => cursor = next.to_string(),
                None => return false,
            }
        }
        true
    }

    // ========================================================================
    // Lookup and iteration
    // ========================================================================

    pub fn get(&self, code: &str) -> Option<&Ribbon> {
        self.ribbons.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Ribbon> {
        self.ribbons.get_mut(code)
    }

    pub fn get_custom(&self, index: u32) -> Option<&Ribbon> {
        self.custom_codes
            .get(&index)
            .and_then(|code| self.ribbons.get(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.ribbons.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.ribbons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ribbons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ribbon> {
        self.ribbons.values()
    }

    /// Enabled ribbons whose rule implements the transition check.
    pub fn transition_ribbons(&self) -> impl Iterator<Item = &Ribbon> {
        self.ribbons
            .values()
            .filter(|r| r.enabled() && r.achievement().checks_transition())
    }

    /// Enabled ribbons whose rule implements the statistics check.
    pub fn stat_ribbons(&self) -> impl Iterator<Item = &Ribbon> {
        self.ribbons
            .values()
            .filter(|r| r.enabled() && r.achievement().checks_stats())
    }

    /// Enabled ribbons whose rule implements the event check.
    pub fn event_ribbons(&self) -> impl Iterator<Item = &Ribbon> {
        self.ribbons
            .values()
            .filter(|r| r.enabled() && r.achievement().checks_event())
    }

    /// Enable or disable a ribbon without unregistering it.
    pub fn set_enabled(&mut self, code: &str, enabled: bool) -> bool {
        match self.ribbons.get_mut(code) {
            Some(ribbon) => {
                ribbon.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Readiness
    // ========================================================================

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Mark the pool complete and fire queued ready callbacks once.
    pub fn mark_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        log::info!("ribbon pool ready with {} ribbons", self.ribbons.len());
        for callback in self.ready_callbacks.drain(..) {
            callback();
        }
    }

    /// Run `callback` when the pool becomes ready, or immediately if it
    /// already is.
    pub fn on_ready(&mut self, callback: impl FnOnce() + Send + 'static) {
        if self.ready {
            callback();
        } else {
            self.ready_callbacks.push(Box::new(callback));
        }
    }

    // ========================================================================
    // Built-in construction
    // ========================================================================

    /// Build the full built-in ribbon set for a solar system.
    pub fn create_builtins(&mut self, registry: &mut ActivityRegistry, catalog: &BodyCatalog) {
        self.create_global_ribbons(registry);
        self.create_threshold_chains(registry);
        for body in catalog.bodies() {
            self.create_body_ribbons(registry, body);
        }
        for index in CUSTOM_SLOTS {
            self.register_custom(
                index,
                &format!("Custom Ribbon {}", index - CUSTOM_SLOTS.start + 1),
                "A ribbon awarded at the discretion of mission control",
                &format!("ribbons/custom{index}"),
                0,
                registry,
            );
        }
        log::info!("created {} built-in ribbons", self.ribbons.len());
    }

    fn create_global_ribbons(&mut self, registry: &mut ActivityRegistry) {
        use AchievementKind::*;
        let singles: Vec<(Achievement, &str)> = vec![
            (Achievement::new(DangerousEva, 100), "ribbons/dangerouseva"),
            (Achievement::new(Splashdown, 80), "ribbons/splashdown"),
            (Achievement::new(EvaInHomeWaters, 90), "ribbons/homewaters"),
            (Achievement::new(Collision, 0), "ribbons/collision"),
            (Achievement::new(InSpace, 999_000), "ribbons/firstinspace"),
            (
                Achievement::new(FirstEvaInSpace, 899_000),
                "ribbons/firstevainspace",
            ),
            (Achievement::new(GrandTour, 600_000), "ribbons/grandtour"),
            (Achievement::new(MoonsTour, 300_000), "ribbons/moonstour"),
            (
                Achievement::new(Service { spec: Specialization::Pilot }, 11),
                "ribbons/servicepilot",
            ),
            (
                Achievement::new(Service { spec: Specialization::Engineer }, 11),
                "ribbons/serviceengineer",
            ),
            (
                Achievement::new(Service { spec: Specialization::Scientist }, 11),
                "ribbons/servicescientist",
            ),
        ];
        for (achievement, texture) in singles {
            self.register(Ribbon::new(texture, achievement), registry);
        }

        // paired first/non-first globals
        let wet = Ribbon::new("ribbons/weteva", Achievement::new(WetEva { first: false }, 120));
        let wet_first = Ribbon::superseding(
            "ribbons/weteva1",
            Achievement::new(WetEva { first: true }, 121),
            &wet,
        );
        self.register(wet, registry);
        self.register(wet_first, registry);

        let deep = Ribbon::new(
            "ribbons/deepspace",
            Achievement::new(DeepSpace { first: false }, 700_000),
        );
        let deep_first = Ribbon::superseding(
            "ribbons/deepspace1",
            Achievement::new(DeepSpace { first: true }, 700_001),
            &deep,
        );
        self.register(deep, registry);
        self.register(deep_first, registry);
    }

    fn create_threshold_chains(&mut self, registry: &mut ActivityRegistry) {
        use AchievementKind::*;
        self.chain(registry, "ribbons/missions", MISSION_COUNT_TIERS, |&(count, _)| {
            MissionsFlown { count }
        });
        self.chain(registry, "ribbons/missiontime", MISSION_TIME_DAYS, |&(days, _)| {
            MissionTime { seconds: days * SECONDS_PER_DAY }
        });
        self.chain(registry, "ribbons/endurance", ENDURANCE_DAYS, |&(days, _)| {
            SingleMissionTime { seconds: days * SECONDS_PER_DAY }
        });
        self.chain(registry, "ribbons/fastorbit", FAST_ORBIT_SECONDS, |&(seconds, _)| {
            FastOrbit { seconds }
        });
        self.chain(registry, "ribbons/heavyvehicle", HEAVY_MASS_TONS, |&(mass, _)| {
            HeavyVehicle { mass }
        });
        self.chain(registry, "ribbons/heavylaunch", HEAVY_MASS_TONS, |&(mass, _)| {
            HeavyVehicleLaunch { mass }
        });
        self.chain(registry, "ribbons/heavylanding", HEAVY_MASS_TONS, |&(mass, _)| {
            HeavyVehicleLanding { mass }
        });
        self.chain(registry, "ribbons/solidfuel", SOLID_FUEL_PERCENT, |&(percent, _)| {
            SolidFuelLaunch { percent }
        });
        self.chain(registry, "ribbons/geeforce", GEE_FORCE, |&(gee, _)| {
            HighGeeForce { gee }
        });
        self.chain(registry, "ribbons/mach", MACH, |&(mach, _)| MachNumber { mach });
        self.chain(registry, "ribbons/contracts", CONTRACT_TIERS, |&(count, _)| {
            Contracts { count }
        });
        let mut nr = 0;
        self.chain(registry, "ribbons/research", RESEARCH_POINTS, |&(points, _)| {
            nr += 1;
            Research { nr, points }
        });
        self.chain(registry, "ribbons/evatime", EVA_TOTAL_SECONDS, |&(seconds, _)| {
            EvaTotalTime { seconds }
        });
        self.chain(registry, "ribbons/evaendurance", EVA_ENDURANCE_SECONDS, |&(seconds, _)| {
            EvaEndurance { seconds }
        });
    }

    /// Register a tier chain where each ribbon supersedes the previous tier.
    fn chain(
        &mut self,
        registry: &mut ActivityRegistry,
        texture_base: &str,
        tiers: &[(u32, i32)],
        mut kind: impl FnMut(&(u32, i32)) -> AchievementKind,
    ) {
        let mut previous: Option<String> = None;
        for (tier, entry) in tiers.iter().enumerate() {
            let achievement = Achievement::new(kind(entry), entry.1);
            let texture = format!("{texture_base}{}", tier + 1);
            let ribbon = match &previous {
                Some(code) => Ribbon::superseding_code(texture, achievement, code.clone()),
                None => Ribbon::new(texture, achievement),
            };
            previous = Some(ribbon.code());
            self.register(ribbon, registry);
        }
    }

    /// All per-body ribbons a body's capabilities allow, with the usual
    /// supersede layout: first supersedes non-first, and the plain orbit
    /// ribbon supersedes the sphere-of-influence ribbon.
    fn create_body_ribbons(&mut self, registry: &mut ActivityRegistry, body: &BodyInfo) {
        use AchievementKind::*;
        let name = body.name.clone();
        let prestige = body.base_prestige;

        if body.is_sun {
            self.register(
                Ribbon::new(
                    format!("ribbons/closersolarorbit-{name}"),
                    Achievement::new(CloserSolarOrbit { body: name.clone() }, prestige + 40),
                ),
                registry,
            );
            self.body_pair(registry, "orbit", prestige + 15, |first| Orbit {
                body: name.clone(),
                first,
            });
            return;
        }

        if !body.is_homeworld {
            self.register(
                Ribbon::new(
                    format!("ribbons/soi-{name}"),
                    Achievement::new(SphereOfInfluence { body: name.clone() }, prestige),
                ),
                registry,
            );
            if body.has_atmosphere {
                self.body_pair(registry, "atmosphere", prestige + 10, |first| {
                    EnteringAtmosphere { body: name.clone(), first }
                });
            }
        }

        // the plain orbit ribbon replaces the bare flyby in the display row
        let soi_code = format!("I:{name}");
        let orbit = Achievement::new(
            Orbit { body: name.clone(), first: false },
            prestige + 15,
        );
        let orbit_ribbon = if self.contains(&soi_code) {
            Ribbon::superseding_code(format!("ribbons/orbit-{name}"), orbit, soi_code)
        } else {
            Ribbon::new(format!("ribbons/orbit-{name}"), orbit)
        };
        let orbit_first = Ribbon::superseding(
            format!("ribbons/orbit1-{name}"),
            Achievement::new(Orbit { body: name.clone(), first: true }, prestige + 16),
            &orbit_ribbon,
        );
        self.register(orbit_ribbon, registry);
        self.register(orbit_first, registry);

        self.body_pair(registry, "docking", prestige + 20, |first| Docking {
            body: name.clone(),
            first,
        });
        self.body_pair(registry, "eva", prestige + 25, |first| Eva {
            body: name.clone(),
            first,
        });
        self.body_pair(registry, "evaorbit", prestige + 26, |first| EvaOrbit {
            body: name.clone(),
            first,
        });

        if body.has_surface() {
            self.body_pair(registry, "landing", prestige + 30, |first| Landing {
                body: name.clone(),
                first,
            });
            self.body_pair(registry, "flag", prestige + 32, |first| PlantFlag {
                body: name.clone(),
                first,
            });
            self.body_pair(registry, "evaground", prestige + 28, |first| EvaGround {
                body: name.clone(),
                first,
            });
            self.body_pair(registry, "rover", prestige + 34, |first| Rover {
                body: name.clone(),
                first,
            });
        }

        if body.is_gas_giant {
            self.register(
                Ribbon::new(
                    format!("ribbons/deepatmosphere-{name}"),
                    Achievement::new(DeepAtmosphere { body: name.clone() }, prestige + 38),
                ),
                registry,
            );
        }
    }

    /// Register a non-first/first pair where the first supersedes the plain
    /// ribbon and carries one extra prestige point.
    fn body_pair(
        &mut self,
        registry: &mut ActivityRegistry,
        family: &str,
        prestige: i32,
        mut kind: impl FnMut(bool) -> AchievementKind,
    ) {
        let plain_achievement = Achievement::new(kind(false), prestige);
        let body = plain_achievement
            .visited_body()
            .unwrap_or_default()
            .to_string();
        let plain = Ribbon::new(format!("ribbons/{family}-{body}"), plain_achievement);
        let first = Ribbon::superseding(
            format!("ribbons/{family}1-{body}"),
            Achievement::new(kind(true), prestige + 1),
            &plain,
        );
        self.register(plain, registry);
        self.register(first, registry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_pool() -> (RibbonPool, ActivityRegistry) {
        let mut pool = RibbonPool::new();
        let mut registry = ActivityRegistry::new();
        pool.create_builtins(&mut registry, &BodyCatalog::default_system());
        (pool, registry)
    }

    #[test]
    fn test_builtins_cover_families_and_bodies() {
        let (pool, registry) = built_pool();
        // global singles
        assert!(pool.contains("DE"));
        assert!(pool.contains("S1"));
        assert!(pool.contains("GT"));
        // tier chains
        assert!(pool.contains("FO:120"));
        assert!(pool.contains("HS:1000"));
        assert!(pool.contains("M10"));
        // per-body pairs
        assert!(pool.contains("O:Luna"));
        assert!(pool.contains("O1:Luna"));
        assert!(pool.contains("L:Ares"));
        // the homeworld has no SOI ribbon
        assert!(!pool.contains("I:Terra"));
        // gas giants have no landing ribbon but a deep atmosphere one
        assert!(!pool.contains("L:Jove"));
        assert!(pool.contains("DA:Jove"));
        // custom slots
        assert!(pool.get_custom(100).is_some());
        assert!(pool.get_custom(119).is_some());
        assert!(pool.get_custom(120).is_none());
        // every ribbon registered an activity
        assert_eq!(registry.len(), pool.len());
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let (mut pool, mut registry) = built_pool();
        let before = pool.len();
        let dup = Ribbon::new(
            "ribbons/other",
            Achievement::new(AchievementKind::DangerousEva, 999),
        );
        assert!(!pool.register(dup, &mut registry));
        assert_eq!(pool.len(), before);
        assert_eq!(pool.get("DE").map(Ribbon::prestige), Some(100));
    }

    #[test]
    fn test_supersede_chains_are_acyclic() {
        let (pool, _) = built_pool();
        for ribbon in pool.iter() {
            let mut cursor = ribbon.supersedes().map(str::to_string);
            let mut hops = 0;
            while let Some(code) = cursor {
                assert_ne!(code, ribbon.code(), "cycle through {}", ribbon.code());
                hops += 1;
                assert!(hops <= pool.len(), "unbounded chain from {}", ribbon.code());
                cursor = pool
                    .get(&code)
                    .and_then(Ribbon::supersedes)
                    .map(str::to_string);
            }
        }
    }

    #[test]
    fn test_cycle_registration_refused() {
        let mut pool = RibbonPool::new();
        let mut registry = ActivityRegistry::new();
        let a = Ribbon::superseding_code(
            "ribbons/a",
            Achievement::new(AchievementKind::Custom {
                index: 2000,
                name: "A".to_string(),
                description: String::new(),
            }, 1),
            "X2001",
        );
        let b = Ribbon::superseding_code(
            "ribbons/b",
            Achievement::new(AchievementKind::Custom {
                index: 2001,
                name: "B".to_string(),
                description: String::new(),
            }, 1),
            "X2000",
        );
        assert!(pool.register(a, &mut registry));
        assert!(!pool.register(b, &mut registry));
        // self-supersede is the smallest cycle
        let c = Ribbon::superseding_code(
            "ribbons/c",
            Achievement::new(AchievementKind::Custom {
                index: 2002,
                name: "C".to_string(),
                description: String::new(),
            }, 1),
            "X2002",
        );
        assert!(!pool.register(c, &mut registry));
    }

    #[test]
    fn test_plugin_customs_respect_reserved_base() {
        let mut pool = RibbonPool::new();
        let mut registry = ActivityRegistry::new();
        assert!(!pool.register_plugin_custom(
            42,
            "Too Low",
            "",
            "ribbons/x",
            10,
            &mut registry
        ));
        assert!(pool.register_plugin_custom(
            1042,
            "Fine",
            "",
            "ribbons/x",
            10,
            &mut registry
        ));
        assert_eq!(pool.get_custom(1042).map(Ribbon::name), Some("Fine".to_string()));
    }

    #[test]
    fn test_ready_callbacks_fire_once_and_late_subscribers_immediately() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let mut pool = RibbonPool::new();
        let fired = Arc::new(AtomicU32::new(0));
        let f = fired.clone();
        pool.on_ready(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        pool.mark_ready();
        pool.mark_ready();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let f = fired.clone();
        pool.on_ready(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disabled_ribbons_skip_evaluation_iterators() {
        let (mut pool, _) = built_pool();
        assert!(pool.transition_ribbons().any(|r| r.code() == "DE"));
        pool.set_enabled("DE", false);
        assert!(!pool.transition_ribbons().any(|r| r.code() == "DE"));
        // still registered
        assert!(pool.contains("DE"));
    }
}
