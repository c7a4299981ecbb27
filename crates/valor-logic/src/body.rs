//! Celestial-body capability catalog.
//!
//! Which ribbons exist for a body is a fixed property of that body: no
//! landings on a gas giant, no atmosphere-entry ribbon on an airless moon,
//! and so on. The catalog captures those capabilities as plain data so the
//! ribbon pool can build its per-body ribbon families without ad hoc
//! special cases. Hosts with a different planetary system supply their own
//! catalog; [`BodyCatalog::default_system`] provides the stock one.

use serde::{Deserialize, Serialize};

/// Static description of one celestial body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyInfo {
    /// Unique body name, the identity key used everywhere.
    pub name: String,
    /// The body everything else orbits. At most one per catalog is expected.
    pub is_sun: bool,
    /// The body crews launch from.
    pub is_homeworld: bool,
    /// Gas giants have no surface to land on.
    pub is_gas_giant: bool,
    pub has_atmosphere: bool,
    /// Altitude in meters where the atmosphere ends. Zero for airless bodies.
    pub atmosphere_ceiling: f64,
    /// Name of the body this one orbits, `None` for the sun.
    pub parent: Option<String>,
    /// Orbit periapsis around the parent, in meters.
    pub orbit_periapsis: f64,
    /// Orbit apoapsis around the parent, in meters.
    pub orbit_apoapsis: f64,
    /// Base prestige for ribbons of this body; family offsets are added on
    /// top.
    pub base_prestige: i32,
}

impl BodyInfo {
    /// Whether the body has a solid surface to land on, plant flags on, or
    /// drive rovers over.
    pub fn has_surface(&self) -> bool {
        !self.is_sun && !self.is_gas_giant
    }
}

/// The set of celestial bodies the engine builds ribbons for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyCatalog {
    bodies: Vec<BodyInfo>,
}

impl BodyCatalog {
    pub fn new(bodies: Vec<BodyInfo>) -> Self {
        Self { bodies }
    }

    /// The stock planetary system: one sun, five planets, six moons.
    pub fn default_system() -> Self {
        fn body(
            name: &str,
            parent: Option<&str>,
            base_prestige: i32,
            atmosphere_ceiling: f64,
            orbit_periapsis: f64,
            orbit_apoapsis: f64,
        ) -> BodyInfo {
            BodyInfo {
                name: name.to_string(),
                is_sun: parent.is_none(),
                is_homeworld: name == "Terra",
                is_gas_giant: name == "Jove",
                has_atmosphere: atmosphere_ceiling > 0.0,
                atmosphere_ceiling,
                parent: parent.map(|p| p.to_string()),
                orbit_periapsis,
                orbit_apoapsis,
                base_prestige,
            }
        }

        Self::new(vec![
            body("Helios", None, 50_000, 600_000.0, 0.0, 0.0),
            body("Vulcan", Some("Helios"), 40_000, 0.0, 4.5e9, 5.0e9),
            body("Aphrodite", Some("Helios"), 35_000, 90_000.0, 9.0e9, 9.5e9),
            body("Terra", Some("Helios"), 100, 70_000.0, 13.5e9, 13.6e9),
            body("Luna", Some("Terra"), 10_000, 0.0, 1.1e7, 1.2e7),
            body("Ares", Some("Helios"), 25_000, 50_000.0, 2.0e10, 2.1e10),
            body("Phobos", Some("Ares"), 26_000, 0.0, 9.0e6, 9.4e6),
            body("Deimos", Some("Ares"), 27_000, 0.0, 2.3e7, 2.4e7),
            body("Jove", Some("Helios"), 45_000, 200_000.0, 6.5e10, 7.2e10),
            body("Io", Some("Jove"), 46_000, 0.0, 4.2e8, 4.2e8),
            body("Europa", Some("Jove"), 47_000, 0.0, 6.7e8, 6.7e8),
            body("Ganymede", Some("Jove"), 48_000, 0.0, 1.0e9, 1.1e9),
            body("Callisto", Some("Jove"), 49_000, 0.0, 1.8e9, 1.9e9),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&BodyInfo> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn bodies(&self) -> &[BodyInfo] {
        &self.bodies
    }

    pub fn homeworld(&self) -> Option<&BodyInfo> {
        self.bodies.iter().find(|b| b.is_homeworld)
    }

    /// The sun the homeworld orbits, for multi-star catalogs.
    pub fn sun_of_homeworld(&self) -> Option<&BodyInfo> {
        let home = self.homeworld()?;
        let mut current = home;
        while let Some(parent) = current.parent.as_deref().and_then(|p| self.get(p)) {
            if parent.is_sun {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Planet with the smallest periapsis around the given sun.
    pub fn innermost_planet_of(&self, sun: &str) -> Option<&BodyInfo> {
        self.bodies
            .iter()
            .filter(|b| b.parent.as_deref() == Some(sun))
            .min_by(|a, b| {
                a.orbit_periapsis
                    .partial_cmp(&b.orbit_periapsis)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Planet with the largest apoapsis around the given sun, the deep-space
    /// boundary marker.
    pub fn outermost_planet_of(&self, sun: &str) -> Option<&BodyInfo> {
        self.bodies
            .iter()
            .filter(|b| b.parent.as_deref() == Some(sun))
            .max_by(|a, b| {
                a.orbit_apoapsis
                    .partial_cmp(&b.orbit_apoapsis)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Moons of the given body, in catalog order.
    pub fn moons_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BodyInfo> {
        self.bodies
            .iter()
            .filter(move |b| b.parent.as_deref() == Some(name))
    }

    /// The first gas giant in the catalog, the target of the moons tour.
    pub fn gas_giant(&self) -> Option<&BodyInfo> {
        self.bodies.iter().find(|b| b.is_gas_giant)
    }

    /// All bodies except suns; the grand tour requires visiting every one.
    pub fn non_sun_names(&self) -> Vec<&str> {
        self.bodies
            .iter()
            .filter(|b| !b.is_sun)
            .map(|b| b.name.as_str())
            .collect()
    }

    /// Altitude where the atmosphere of `name` ends, zero for airless or
    /// unknown bodies.
    pub fn atmosphere_ceiling(&self, name: &str) -> f64 {
        self.get(name).map(|b| b.atmosphere_ceiling).unwrap_or(0.0)
    }
}
