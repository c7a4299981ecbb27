//! Vessel state snapshots and discrete event reports.
//!
//! The host simulation delivers its world state as read-only snapshots:
//! one [`VesselSnapshot`] per observed change, paired with the previous
//! snapshot of the same vessel or EVA (if any), plus [`EventReport`]s for
//! discrete occurrences such as collisions. Rule predicates only ever read
//! these values; nothing here is mutated by the achievement engine.

use serde::{Deserialize, Serialize};

/// Flight situation of a vessel, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    /// Sitting on the launch pad, mission clock not yet running.
    Prelaunch,
    /// Resting on a solid surface.
    Landed,
    /// In atmospheric flight.
    Flying,
    /// On a ballistic arc that will intersect the surface.
    SubOrbital,
    /// In a stable orbit around the main body.
    Orbiting,
    /// On an escape trajectory out of the main body's sphere of influence.
    Escaping,
    /// Docked to another vessel.
    Docked,
    /// Floating in a liquid surface.
    Splashed,
}

/// Broad vessel category, used by rules that only apply to certain craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselType {
    Ship,
    Lander,
    Station,
    Rover,
    Probe,
}

/// One part of the origin vessel, as far as rules care about it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartSnapshot {
    /// Dry mass of the part in tons.
    pub mass: f64,
    /// Whether the part is currently staged/active.
    pub active: bool,
    /// Solid fuel stored in the part, in tons.
    pub solid_fuel: f64,
}

/// Physical data of the vessel a crew member belongs to.
///
/// Absent entirely when the host could not resolve an origin vessel; rules
/// that need it short-circuit to "no match" in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselInfo {
    /// Total vessel mass in tons.
    pub total_mass: f64,
    pub vessel_type: VesselType,
    /// Part list, used by the solid-fuel launch rules.
    pub parts: Vec<PartSnapshot>,
    /// Instantaneous acceleration in g.
    pub gee_force: f64,
    /// Acceleration in g sustained over the host inspector's window.
    ///
    /// The sampling lives outside this engine; rules consume the value as an
    /// opaque statistic.
    pub gee_force_sustained: f64,
    /// Horizontal mach number.
    pub mach_horizontal: f64,
}

/// A read-only sample of a vessel's (or EVA crew member's) state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    /// True when this snapshot describes a crew member on EVA rather than a
    /// crewed vessel.
    pub is_eva: bool,
    pub situation: Situation,
    /// Name of the celestial body whose sphere of influence the vessel is in.
    /// `None` means deep space between spheres of influence.
    pub main_body: Option<String>,
    /// Altitude above the main body in meters.
    pub altitude: f64,
    /// Local atmospheric density.
    pub atm_density: f64,
    /// Orbit apoapsis above the main body, in meters.
    pub apoapsis: f64,
    /// Orbit periapsis above the main body, in meters.
    pub periapsis: f64,
    /// The vessel this crew member belongs to, if the host resolved one.
    pub origin: Option<VesselInfo>,
    /// True if a flag has been planted during the current surface stay.
    pub flag_planted: bool,
    /// True if the vessel has moved under its own power on the surface.
    pub moved_on_surface: bool,
    /// True while the host still classifies the situation as a launch.
    pub is_launch: bool,
    /// Mission elapsed time in seconds.
    pub mission_time: f64,
    /// Monotonic universal timestamp in seconds.
    pub universal_time: f64,
}

impl VesselSnapshot {
    pub fn in_orbit(&self) -> bool {
        self.situation == Situation::Orbiting
    }

    pub fn is_landed(&self) -> bool {
        self.situation == Situation::Landed
    }

    pub fn is_prelaunch(&self) -> bool {
        self.situation == Situation::Prelaunch
    }

    pub fn is_splashed(&self) -> bool {
        self.situation == Situation::Splashed
    }

    /// Name of the main body, or `None` in deep space.
    pub fn body_name(&self) -> Option<&str> {
        self.main_body.as_deref()
    }

    /// Ratio of active solid fuel mass to total vessel mass, from the part
    /// list. Zero when no origin vessel is known or the vessel is massless.
    pub fn solid_fuel_ratio(&self) -> f64 {
        let Some(origin) = &self.origin else {
            return 0.0;
        };
        let total: f64 = origin.parts.iter().map(|p| p.mass).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let solid: f64 = origin
            .parts
            .iter()
            .filter(|p| p.active)
            .map(|p| p.solid_fuel)
            .sum();
        solid / total
    }
}

/// Discrete world events reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A part collided with something.
    Collision,
    /// The mission was aborted by the crew.
    Abort,
    /// A part exploded.
    Explosion,
}

/// A discrete event plus the minimal context rules need to guard on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub kind: EventKind,
    /// True when the origin vessel carries crew.
    pub origin_crewed: bool,
    /// True when the origin is a crew member on EVA.
    pub origin_is_eva: bool,
    /// Crew members affected by the event.
    pub crew: Vec<String>,
    /// Universal time of the event in seconds.
    pub universal_time: f64,
}
