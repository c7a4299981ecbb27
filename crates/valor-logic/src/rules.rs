//! The achievement rule set.
//!
//! Every awardable decoration wraps exactly one [`Achievement`]: a named
//! predicate over simulation state. Rules come in three shapes: transition
//! checks over a (previous, current) snapshot pair, cumulative checks over a
//! crew member's [`CrewStats`], and discrete event checks. Each family
//! implements whichever of the three applies to it; a family that does not
//! implement a shape simply never matches through it.
//!
//! Families are a closed set: one enum variant per family, parameterized
//! with its threshold and/or celestial body. "State" lives entirely in the
//! snapshots and stats passed in; the rules themselves are pure.

use serde::{Deserialize, Serialize};

use crate::body::BodyCatalog;
use crate::snapshot::{EventKind, EventReport, Situation, VesselSnapshot, VesselType};
use crate::stats::{CrewStats, Specialization};

/// Atmospheric density below which space counts as vacuum.
const NO_ATMOSPHERE: f64 = 0.000_000_1;

/// Density from which an atmosphere counts as "deep".
const DEEP_ATMOSPHERE_DENSITY: f64 = 10.0;

/// Ceiling for the horizontal mach ribbons, in meters.
const MACH_MAX_ALTITUDE: f64 = 30_000.0;

/// One achievement family, with its per-instance parameters.
///
/// `first: true` marks the first-achiever variant of a family; it shares the
/// family's predicate and differs only in code, name, and award scoping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AchievementKind {
    // ---- transition rules, global ----
    /// EVA while neither in orbit nor on the surface.
    DangerousEva,
    /// Splashdown of a flying vessel.
    Splashdown,
    /// EVA while splashed in homeworld waters.
    EvaInHomeWaters,
    /// EVA while splashed anywhere but the homeworld.
    WetEva { first: bool },
    /// Crossing the homeworld's atmosphere ceiling outward.
    InSpace,
    /// Very first sampled state of an EVA, in vacuum above the atmosphere.
    FirstEvaInSpace,
    /// Launching with solid boosters at a given percentage of vessel mass.
    SolidFuelLaunch { percent: u32 },
    /// Sustaining an acceleration of at least `gee` g.
    HighGeeForce { gee: u32 },
    /// Horizontal flight at a given mach number below the mach ceiling.
    MachNumber { mach: u32 },
    /// Reaching homeworld orbit in under `seconds` of mission time.
    FastOrbit { seconds: u32 },
    /// Crewing a vessel heavier than `mass` tons.
    HeavyVehicle { mass: u32 },
    /// Launching a vessel heavier than `mass` tons.
    HeavyVehicleLaunch { mass: u32 },
    /// Landing a vessel heavier than `mass` tons.
    HeavyVehicleLanding { mass: u32 },
    /// Passing beyond the orbit of the outermost planet.
    DeepSpace { first: bool },

    // ---- transition rules, per celestial body ----
    /// Entering the sphere of influence of a body.
    SphereOfInfluence { body: String },
    /// Crossing into a body's atmosphere from outside.
    EnteringAtmosphere { body: String, first: bool },
    /// Landing on a body (launches do not count).
    Landing { body: String, first: bool },
    /// Planting a flag on a body's surface.
    PlantFlag { body: String, first: bool },
    /// EVA in vacuum above a body's atmosphere.
    Eva { body: String, first: bool },
    /// EVA in a stable orbit around a body.
    EvaOrbit { body: String, first: bool },
    /// EVA standing on a body's surface.
    EvaGround { body: String, first: bool },
    /// Reaching a stable orbit around a body.
    Orbit { body: String, first: bool },
    /// Docking in orbit around a body.
    Docking { body: String, first: bool },
    /// Driving a rover on a body's surface.
    Rover { body: String, first: bool },
    /// Descending into the dense layers of a gas giant's atmosphere.
    DeepAtmosphere { body: String },
    /// Orbiting the sun closer than half the innermost planet's periapsis.
    CloserSolarOrbit { body: String },

    // ---- cumulative rules over crew statistics ----
    /// Total mission time above `seconds`.
    MissionTime { seconds: u32 },
    /// Longest single completed mission above `seconds`.
    SingleMissionTime { seconds: u32 },
    /// A single continuous EVA of at least `seconds`.
    EvaEndurance { seconds: u32 },
    /// Total EVA time above `seconds`.
    EvaTotalTime { seconds: u32 },
    /// At least `count` missions flown.
    MissionsFlown { count: u32 },
    /// At least `count` contracts completed.
    Contracts { count: u32 },
    /// At least `points` science points researched. `nr` is the tier number
    /// used in the display name.
    Research { nr: u32, points: u32 },
    /// At least one mission completed in the given specialization.
    Service { spec: Specialization },

    // ---- event rules ----
    /// Collision while aboard a crewed, non-EVA vessel.
    Collision,

    // ---- direct-award rules (no predicate; awarded by the ledger) ----
    /// Visited every non-sun body in the system.
    GrandTour,
    /// Visited every moon of the gas giant.
    MoonsTour,
    /// User-authored ribbon, identified by a small numeric index.
    Custom {
        index: u32,
        name: String,
        description: String,
    },
    /// Ribbon registered by another plugin under its own code.
    External {
        code: String,
        name: String,
        description: String,
        first: bool,
    },
}

/// A rule instance: an [`AchievementKind`] plus its prestige weight.
///
/// Identity, equality, and hashing all go by [`code`](Achievement::code).
/// Ordering is by prestige descending, with the first-achiever variant of a
/// family sorting before its non-first counterpart on ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    kind: AchievementKind,
    prestige: i32,
}

impl Achievement {
    pub fn new(kind: AchievementKind, prestige: i32) -> Self {
        Self { kind, prestige }
    }

    pub fn kind(&self) -> &AchievementKind {
        &self.kind
    }

    pub fn prestige(&self) -> i32 {
        self.prestige
    }

    /// Whether this is the first-achiever variant of its family.
    pub fn first(&self) -> bool {
        use AchievementKind::*;
        match &self.kind {
            InSpace | FirstEvaInSpace => true,
            WetEva { first }
            | DeepSpace { first }
            | EnteringAtmosphere { first, .. }
            | Landing { first, .. }
            | PlantFlag { first, .. }
            | Eva { first, .. }
            | EvaOrbit { first, .. }
            | EvaGround { first, .. }
            | Orbit { first, .. }
            | Docking { first, .. }
            | Rover { first, .. }
            | External { first, .. } => *first,
            _ => false,
        }
    }

    /// Unique, immutable code. Per-body families embed the body name; tiered
    /// families embed the threshold; first-achiever variants carry a `1`.
    pub fn code(&self) -> String {
        use AchievementKind::*;
        fn body_code(prefix: &str, body: &str, first: bool) -> String {
            if first {
                format!("{prefix}1:{body}")
            } else {
                format!("{prefix}:{body}")
            }
        }
        match &self.kind {
            DangerousEva => "DE".to_string(),
            Splashdown => "W".to_string(),
            EvaInHomeWaters => "WE".to_string(),
            WetEva { first } => (if *first { "EE1" } else { "EE" }).to_string(),
            InSpace => "S1".to_string(),
            FirstEvaInSpace => "V1".to_string(),
            SolidFuelLaunch { percent } => format!("B{percent}"),
            HighGeeForce { gee } => format!("H{gee}"),
            MachNumber { mach } => format!("M{mach}"),
            FastOrbit { seconds } => format!("FO:{seconds}"),
            HeavyVehicle { mass } => format!("H:{mass}"),
            HeavyVehicleLaunch { mass } => format!("HL:{mass}"),
            HeavyVehicleLanding { mass } => format!("HS:{mass}"),
            DeepSpace { first } => (if *first { "DS1" } else { "DS" }).to_string(),
            SphereOfInfluence { body } => format!("I:{body}"),
            EnteringAtmosphere { body, first } => body_code("A", body, *first),
            Landing { body, first } => body_code("L", body, *first),
            PlantFlag { body, first } => body_code("F", body, *first),
            Eva { body, first } => body_code("V", body, *first),
            EvaOrbit { body, first } => body_code("E", body, *first),
            EvaGround { body, first } => body_code("G", body, *first),
            Orbit { body, first } => body_code("O", body, *first),
            Docking { body, first } => body_code("DO", body, *first),
            Rover { body, first } => body_code("R", body, *first),
            DeepAtmosphere { body } => format!("DA:{body}"),
            CloserSolarOrbit { body } => format!("CSO:{body}"),
            MissionTime { seconds } => format!("MT:{seconds}"),
            SingleMissionTime { seconds } => format!("ME:{seconds}"),
            EvaEndurance { seconds } => format!("EM:{seconds}"),
            EvaTotalTime { seconds } => format!("ET:{seconds}"),
            MissionsFlown { count } => format!("M:{count}"),
            Contracts { count } => format!("N{count}"),
            Research { points, .. } => format!("YR{points}"),
            Service { spec } => match spec {
                Specialization::Pilot => "QO",
                Specialization::Engineer => "QE",
                Specialization::Scientist => "QS",
            }
            .to_string(),
            Collision => "C".to_string(),
            GrandTour => "GT".to_string(),
            MoonsTour => "JT".to_string(),
            Custom { index, .. } => format!("X{index}"),
            External { code, .. } => code.clone(),
        }
    }

    /// Display name. First-achiever variants get a "First " prefix.
    pub fn name(&self) -> String {
        use AchievementKind::*;
        let base = match &self.kind {
            DangerousEva => "Dangerous EVA".to_string(),
            Splashdown => "Splashdown".to_string(),
            EvaInHomeWaters => "EVA in Home Waters".to_string(),
            WetEva { .. } => "Wet EVA".to_string(),
            InSpace => "Crew in Space".to_string(),
            FirstEvaInSpace => "EVA in Space".to_string(),
            SolidFuelLaunch { percent } => format!("{percent}% Solid Fuel Booster"),
            HighGeeForce { gee } => format!("G-Force {}", roman(*gee)),
            MachNumber { mach } => format!("Mach {}", roman(*mach)),
            FastOrbit { .. } => "Fast Orbit".to_string(),
            HeavyVehicle { .. } => "Heavy Vehicle".to_string(),
            HeavyVehicleLaunch { .. } => "Heavy Vehicle Launch".to_string(),
            HeavyVehicleLanding { .. } => "Heavy Vehicle Landing".to_string(),
            DeepSpace { .. } => "Deep Space".to_string(),
            SphereOfInfluence { body } => format!("{body} Sphere of Influence"),
            EnteringAtmosphere { body, .. } => format!("{body} Atmosphere"),
            Landing { body, .. } => format!("Landing on {body}"),
            PlantFlag { body, .. } => format!("Flag on {body}"),
            Eva { body, .. } => format!("{body} EVA"),
            EvaOrbit { body, .. } => format!("{body} Orbital EVA"),
            EvaGround { body, .. } => format!("{body} Surface EVA"),
            Orbit { body, .. } => format!("{body} Orbit"),
            Docking { body, .. } => format!("{body} Docking"),
            Rover { body, .. } => format!("{body} Rover Drive"),
            DeepAtmosphere { body } => format!("{body} Deep Atmosphere"),
            CloserSolarOrbit { .. } => "Closer Solar Orbit".to_string(),
            MissionTime { .. } => "Mission Time".to_string(),
            SingleMissionTime { .. } => "Endurance".to_string(),
            EvaEndurance { .. } => "EVA Endurance".to_string(),
            EvaTotalTime { .. } => "EVA Time".to_string(),
            MissionsFlown { .. } => "Multiple Missions".to_string(),
            Contracts { .. } => "Multiple Contracts".to_string(),
            Research { nr, .. } => format!("Research {}", roman(*nr)),
            Service { spec } => match spec {
                Specialization::Pilot => "Operational Service",
                Specialization::Engineer => "Engineer Service",
                Specialization::Scientist => "Scientific Service",
            }
            .to_string(),
            Collision => "Collision".to_string(),
            GrandTour => "Grand Tour".to_string(),
            MoonsTour => "Moons Tour".to_string(),
            Custom { name, .. } => name.clone(),
            External { name, .. } => name.clone(),
        };
        if self.first() {
            format!("First {base}")
        } else {
            base
        }
    }

    /// Long description, shown alongside the ribbon.
    pub fn description(&self) -> String {
        use AchievementKind::*;
        let first = if self.first() { " being first crew member and" } else { "" };
        match &self.kind {
            DangerousEva => "Awarded for executing EVA while not in a stable orbit".to_string(),
            Splashdown => "Awarded for a splashdown of a vessel in water".to_string(),
            EvaInHomeWaters => "Awarded for any EVA in homeworld waters".to_string(),
            WetEva { .. } => format!(
                "Awarded for{first} going on EVA in a wet environment away from the homeworld"
            ),
            InSpace => "Awarded for being the first crew member in space".to_string(),
            FirstEvaInSpace => "Awarded for being the first crew member on EVA in space".to_string(),
            SolidFuelLaunch { percent } => format!(
                "Awarded for launching with solid fuel boosters at {percent}% of vessel mass"
            ),
            HighGeeForce { gee } => format!(
                "Awarded for withstanding a sustained acceleration of at least {gee}g"
            ),
            MachNumber { mach } => format!(
                "Awarded for flying horizontally at mach {mach} below {MACH_MAX_ALTITUDE:.0}m in the homeworld atmosphere"
            ),
            FastOrbit { seconds } => {
                format!("Awarded for less than {seconds} seconds into orbit")
            }
            HeavyVehicle { mass } => format!(
                "Awarded to every crew member of a vehicle with a total mass of {mass}t or more"
            ),
            HeavyVehicleLaunch { mass } => format!(
                "Awarded for launching a vehicle with a total mass of {mass}t or more"
            ),
            HeavyVehicleLanding { mass } => format!(
                "Awarded for landing a vehicle with a total mass of {mass}t or more"
            ),
            DeepSpace { .. } => format!(
                "Awarded for{first} entering space beyond the orbit of the outermost planet"
            ),
            SphereOfInfluence { body } => {
                format!("Awarded for entering the sphere of influence of {body}")
            }
            EnteringAtmosphere { body, .. } => {
                format!("Awarded for{first} entering the atmosphere of {body}")
            }
            Landing { body, .. } => format!("Awarded for{first} landing on {body}"),
            PlantFlag { body, .. } => format!("Awarded for{first} planting a flag on {body}"),
            Eva { body, .. } => {
                format!("Awarded for{first} going on EVA in zero atmosphere around {body}")
            }
            EvaOrbit { body, .. } => {
                format!("Awarded for{first} going on EVA in a stable orbit around {body}")
            }
            EvaGround { body, .. } => {
                format!("Awarded for{first} taking footsteps on {body}")
            }
            Orbit { body, .. } => format!("Awarded for{first} orbiting around {body}"),
            Docking { body, .. } => format!("Awarded for{first} docking in {body} orbit"),
            Rover { body, .. } => {
                format!("Awarded for{first} moving a vehicle on the surface of {body}")
            }
            DeepAtmosphere { body } => {
                format!("Awarded for entering the deeper atmosphere of {body}")
            }
            CloserSolarOrbit { body } => format!(
                "Awarded for orbiting {body} closer than half the innermost planet's periapsis"
            ),
            MissionTime { seconds } => format!(
                "Awarded for more than {} days spent in missions",
                seconds / 86_400
            ),
            SingleMissionTime { seconds } => format!(
                "Awarded for more than {} days spent in a single mission and returning safely",
                seconds / 86_400
            ),
            EvaEndurance { seconds } => format!(
                "Awarded for continuously spending {seconds} seconds on EVA"
            ),
            EvaTotalTime { seconds } => {
                format!("Awarded for more than {seconds} seconds spent on EVA")
            }
            MissionsFlown { count } => format!("Awarded for {count} or more missions"),
            Contracts { count } => {
                format!("Awarded for completing {count} or more contracts")
            }
            Research { points, .. } => {
                format!("Awarded for researching {points} or more science points")
            }
            Service { spec } => {
                let trade = match spec {
                    Specialization::Pilot => "pilot",
                    Specialization::Engineer => "engineer",
                    Specialization::Scientist => "scientist",
                };
                format!("Awarded for completing at least a single mission as a {trade}")
            }
            Collision => "Awarded for any collision while in a vessel".to_string(),
            GrandTour => {
                "Awarded for entering the sphere of influence of all celestial bodies".to_string()
            }
            MoonsTour => {
                "Awarded for entering the sphere of influence of all moons of the gas giant"
                    .to_string()
            }
            Custom { description, .. } => description.clone(),
            External { description, .. } => description.clone(),
        }
    }

    /// For custom ribbons, replace the display name and description supplied
    /// by a ribbon pack or plugin. Returns false for every other family.
    pub fn set_custom_text(&mut self, name: &str, description: &str) -> bool {
        match &mut self.kind {
            AchievementKind::Custom {
                name: n,
                description: d,
                ..
            }
            | AchievementKind::External {
                name: n,
                description: d,
                ..
            } => {
                *n = name.to_string();
                *d = description.to_string();
                true
            }
            _ => false,
        }
    }

    /// The celestial body this rule counts as "visiting", if any. Awards of
    /// these families feed the tour visitation sets.
    pub fn visited_body(&self) -> Option<&str> {
        use AchievementKind::*;
        match &self.kind {
            SphereOfInfluence { body }
            | EnteringAtmosphere { body, .. }
            | Landing { body, .. }
            | PlantFlag { body, .. }
            | Eva { body, .. }
            | EvaOrbit { body, .. }
            | EvaGround { body, .. }
            | Orbit { body, .. }
            | Docking { body, .. }
            | Rover { body, .. }
            | DeepAtmosphere { body }
            | CloserSolarOrbit { body } => Some(body),
            _ => None,
        }
    }

    /// Whether the family implements the transition check at all.
    pub fn checks_transition(&self) -> bool {
        use AchievementKind::*;
        !matches!(
            self.kind,
            MissionTime { .. }
                | SingleMissionTime { .. }
                | EvaEndurance { .. }
                | EvaTotalTime { .. }
                | MissionsFlown { .. }
                | Contracts { .. }
                | Research { .. }
                | Service { .. }
                | Collision
                | GrandTour
                | MoonsTour
                | Custom { .. }
                | External { .. }
        )
    }

    /// Whether the family implements the cumulative-statistics check.
    pub fn checks_stats(&self) -> bool {
        use AchievementKind::*;
        matches!(
            self.kind,
            MissionTime { .. }
                | SingleMissionTime { .. }
                | EvaEndurance { .. }
                | EvaTotalTime { .. }
                | MissionsFlown { .. }
                | Contracts { .. }
                | Research { .. }
                | Service { .. }
        )
    }

    /// Whether the family implements the discrete-event check.
    pub fn checks_event(&self) -> bool {
        matches!(self.kind, AchievementKind::Collision)
    }

    /// Evaluate the transition predicate against a snapshot pair.
    ///
    /// The caller always has a current snapshot in hand; a missing previous
    /// snapshot means "no prior state" (fresh vessel or fresh EVA). Missing
    /// data inside the snapshot never matches, it never errors.
    pub fn check_transition(
        &self,
        catalog: &BodyCatalog,
        previous: Option<&VesselSnapshot>,
        current: &VesselSnapshot,
    ) -> bool {
        use AchievementKind::*;
        match &self.kind {
            DangerousEva => {
                let Some(prev) = previous else { return false };
                // only a fresh EVA from a non-EVA state can be dangerous
                if !current.is_eva || prev.is_eva {
                    return false;
                }
                if prev.in_orbit() || current.in_orbit() {
                    return false;
                }
                if prev.is_landed() || current.is_landed() {
                    return false;
                }
                if prev.is_splashed() || current.is_splashed() {
                    return false;
                }
                true
            }
            Splashdown => {
                // no bathing crew members
                if current.is_eva {
                    return false;
                }
                // only flying vessels can splash down
                if let Some(prev) = previous {
                    if prev.situation != Situation::Flying {
                        return false;
                    }
                }
                current.is_splashed()
            }
            EvaInHomeWaters => {
                current.is_eva
                    && current.is_splashed()
                    && is_homeworld(catalog, current.body_name())
            }
            WetEva { .. } => {
                if !current.is_eva || !current.is_splashed() {
                    return false;
                }
                match current.body_name() {
                    Some(body) => !is_homeworld(catalog, Some(body)),
                    None => false,
                }
            }
            InSpace => {
                let Some(prev) = previous else { return false };
                if current.is_prelaunch() || current.is_landed() {
                    return false;
                }
                let Some(body) = current.body_name() else {
                    return false;
                };
                let ceiling = catalog.atmosphere_ceiling(body);
                // the ceiling must be crossed outward by this transition
                prev.altitude <= ceiling && current.altitude > ceiling
            }
            FirstEvaInSpace => {
                // only the very first sampled state of an EVA counts
                if previous.is_some() {
                    return false;
                }
                if !current.is_eva {
                    return false;
                }
                if current.is_landed() || current.is_prelaunch() || current.is_splashed() {
                    return false;
                }
                let Some(body) = current.body_name() else {
                    return false;
                };
                current.atm_density <= NO_ATMOSPHERE
                    && current.altitude >= catalog.atmosphere_ceiling(body)
            }
            SolidFuelLaunch { percent } => {
                if !current.is_launch || current.origin.is_none() {
                    return false;
                }
                current.solid_fuel_ratio() >= f64::from(*percent) / 100.0
            }
            HighGeeForce { gee } => {
                if previous.is_none() || current.is_eva {
                    return false;
                }
                let Some(origin) = &current.origin else {
                    return false;
                };
                if origin.gee_force.is_nan() {
                    return false;
                }
                origin.gee_force >= f64::from(*gee)
                    && origin.gee_force_sustained >= f64::from(*gee)
            }
            MachNumber { mach } => {
                if previous.is_none() || current.is_eva {
                    return false;
                }
                let Some(origin) = &current.origin else {
                    return false;
                };
                if matches!(
                    current.situation,
                    Situation::Prelaunch | Situation::Landed | Situation::Splashed
                ) {
                    return false;
                }
                if current.altitude >= MACH_MAX_ALTITUDE {
                    return false;
                }
                if origin.mach_horizontal < f64::from(*mach) {
                    return false;
                }
                is_homeworld(catalog, current.body_name())
            }
            FastOrbit { seconds } => {
                let Some(prev) = previous else { return false };
                // only new orbits count
                if !current.in_orbit() || prev.in_orbit() {
                    return false;
                }
                if !is_homeworld(catalog, current.body_name()) {
                    return false;
                }
                current.mission_time < f64::from(*seconds)
            }
            HeavyVehicle { mass } => {
                if current.is_eva {
                    return false;
                }
                match &current.origin {
                    Some(origin) => origin.total_mass > f64::from(*mass),
                    None => false,
                }
            }
            HeavyVehicleLaunch { mass } => {
                let Some(prev) = previous else { return false };
                if current.is_eva {
                    return false;
                }
                // this has to be a launch
                if prev.situation != Situation::Landed && prev.situation != Situation::Prelaunch {
                    return false;
                }
                if current.situation != Situation::Flying {
                    return false;
                }
                match &current.origin {
                    Some(origin) => origin.total_mass > f64::from(*mass),
                    None => false,
                }
            }
            HeavyVehicleLanding { mass } => {
                let Some(prev) = previous else { return false };
                if current.is_eva {
                    return false;
                }
                let Some(origin) = &current.origin else {
                    return false;
                };
                if origin.total_mass <= f64::from(*mass) {
                    return false;
                }
                // the situation has to change from airborne to landed
                current.is_landed() && !prev.is_landed() && !prev.is_prelaunch()
            }
            DeepSpace { .. } => {
                let Some(sun) = catalog.sun_of_homeworld() else {
                    return false;
                };
                let Some(outermost) = catalog.outermost_planet_of(&sun.name) else {
                    return false;
                };
                match current.body_name() {
                    Some(body) => {
                        body == sun.name && current.altitude > outermost.orbit_apoapsis
                    }
                    None => false,
                }
            }
            SphereOfInfluence { body } => {
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                match previous {
                    Some(prev) => prev.body_name() != Some(body.as_str()),
                    None => false,
                }
            }
            EnteringAtmosphere { body, .. } => {
                let Some(prev) = previous else { return false };
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                !in_atmosphere(catalog, prev) && in_atmosphere(catalog, current)
            }
            Landing { body, .. } => {
                let Some(prev) = previous else { return false };
                // launching won't count, and neither will stepping outside
                if prev.is_prelaunch() || current.is_eva {
                    return false;
                }
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                current.is_landed() && !prev.is_landed()
            }
            PlantFlag { body, .. } => {
                if !current.flag_planted {
                    return false;
                }
                if previous.is_some_and(|p| p.flag_planted) {
                    return false;
                }
                current.body_name() == Some(body.as_str())
            }
            Eva { body, .. } => {
                // only the very first sampled state of an EVA counts
                if previous.is_some() {
                    return false;
                }
                if !current.is_eva {
                    return false;
                }
                if current.is_landed() || current.is_prelaunch() || current.is_splashed() {
                    return false;
                }
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                current.atm_density <= NO_ATMOSPHERE
                    && current.altitude >= catalog.atmosphere_ceiling(body)
            }
            EvaOrbit { body, .. } => {
                // only the transition into EVA counts
                if previous.is_some_and(|p| p.is_eva) {
                    return false;
                }
                current.is_eva
                    && current.body_name() == Some(body.as_str())
                    && current.atm_density <= NO_ATMOSPHERE
                    && current.in_orbit()
            }
            EvaGround { body, .. } => {
                // a continued surface EVA is not a new one
                if previous.is_some_and(|p| p.is_eva && p.is_landed()) {
                    return false;
                }
                current.is_eva
                    && current.body_name() == Some(body.as_str())
                    && current.is_landed()
            }
            Orbit { body, .. } => {
                current.body_name() == Some(body.as_str()) && current.in_orbit()
            }
            Docking { body, .. } => {
                if previous.is_some_and(|p| p.situation == Situation::Docked) {
                    return false;
                }
                current.situation == Situation::Docked
                    && current.body_name() == Some(body.as_str())
            }
            Rover { body, .. } => {
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                match &current.origin {
                    Some(origin) => {
                        origin.vessel_type == VesselType::Rover && current.moved_on_surface
                    }
                    None => false,
                }
            }
            DeepAtmosphere { body } => {
                current.atm_density >= DEEP_ATMOSPHERE_DENSITY
                    && current.body_name() == Some(body.as_str())
            }
            CloserSolarOrbit { body } => {
                if current.body_name() != Some(body.as_str()) {
                    return false;
                }
                let Some(innermost) = catalog.innermost_planet_of(body) else {
                    return false;
                };
                let max_distance = innermost.orbit_periapsis / 2.0;
                current.periapsis <= max_distance && current.apoapsis <= max_distance
            }
            _ => false,
        }
    }

    /// Evaluate the cumulative-statistics predicate.
    pub fn check_stats(&self, stats: &CrewStats) -> bool {
        use AchievementKind::*;
        match &self.kind {
            MissionTime { seconds } => stats.total_mission_time > f64::from(*seconds),
            SingleMissionTime { seconds } => stats.longest_mission_time > f64::from(*seconds),
            EvaEndurance { seconds } => {
                stats.total_eva_time > 0.0 && stats.last_eva_duration >= f64::from(*seconds)
            }
            EvaTotalTime { seconds } => stats.total_eva_time > f64::from(*seconds),
            MissionsFlown { count } => stats.missions_flown >= *count,
            Contracts { count } => stats.contracts_completed >= *count,
            Research { points, .. } => stats.research >= f64::from(*points),
            Service { spec } => {
                stats.specialization == Some(*spec) && stats.missions_flown > 0
            }
            _ => false,
        }
    }

    /// Evaluate the discrete-event predicate.
    pub fn check_event(&self, report: &EventReport) -> bool {
        match &self.kind {
            AchievementKind::Collision => {
                report.kind == EventKind::Collision
                    && report.origin_crewed
                    && !report.origin_is_eva
            }
            _ => false,
        }
    }
}

impl PartialEq for Achievement {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Achievement {}

impl std::hash::Hash for Achievement {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl PartialOrd for Achievement {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Achievement {
    /// Prestige descending, first-achiever variant before its counterpart,
    /// code as the final tie-break for a total order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .prestige
            .cmp(&self.prestige)
            .then_with(|| other.first().cmp(&self.first()))
            .then_with(|| self.code().cmp(&other.code()))
    }
}

fn is_homeworld(catalog: &BodyCatalog, body: Option<&str>) -> bool {
    match body {
        Some(name) => catalog.get(name).is_some_and(|b| b.is_homeworld),
        None => false,
    }
}

fn in_atmosphere(catalog: &BodyCatalog, snap: &VesselSnapshot) -> bool {
    match snap.body_name() {
        Some(name) => {
            let Some(body) = catalog.get(name) else {
                return false;
            };
            body.has_atmosphere && snap.altitude < body.atmosphere_ceiling
        }
        None => false,
    }
}

/// Roman numeral for the small tier numbers used in display names.
fn roman(value: u32) -> String {
    const DIGITS: &[(u32, &str)] = &[
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut rest = value;
    let mut out = String::new();
    for &(n, s) in DIGITS {
        while rest >= n {
            out.push_str(s);
            rest -= n;
        }
    }
    out
}
