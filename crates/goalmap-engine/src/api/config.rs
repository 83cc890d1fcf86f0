use serde::{Deserialize, Serialize};

/// Tunable constants for a Goal Map window.
///
/// Every field has a default, so a host can override only what it cares
/// about (`{"star_count": 400}` is a valid JSON config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Fixed simulation step in seconds (default: 1/60).
    pub fixed_dt: f32,

    // -- Layout engine --
    /// Smallest planet radius in scene units.
    pub min_planet_radius: f32,
    /// Radius bonus for a planet that owns the whole note's workload.
    pub max_planet_bonus: f32,
    /// Moon count at which the density factor saturates to 1.0.
    pub saturation_threshold: f32,
    /// Uniform noise added to each planet radius.
    pub planet_radius_noise: (f32, f32),
    /// First orbit radius before any planet is packed.
    pub orbit_start: f32,
    /// Extra starting orbit per moon in the whole system.
    pub orbit_start_per_moon: f32,
    /// Width a single moon adds to its planet's orbit band.
    pub moon_footprint: f32,
    /// Random gap between consecutive orbit bands.
    pub orbit_gap: (f32, f32),
    /// Smallest sun radius.
    pub min_sun_radius: f32,
    /// Sun radius relative to the largest planet.
    pub sun_radius_factor: f32,
    /// Free space between the sun and the innermost planet band.
    pub sun_clearance: f32,

    // -- Moons --
    /// Distance from the planet surface to the first moon lane.
    pub first_moon_gap: f32,
    /// Clearance on each side of a moon lane.
    pub moon_spacing: f32,
    /// Extra gap after each moon lane.
    pub moon_lane_gap: f32,
    /// Smallest moon radius.
    pub min_moon_radius: f32,

    // -- Camera --
    /// Per-step exponential ease factor for the viewport.
    pub camera_ease: f32,
    /// Relative margin around a pinned planet's system.
    pub planet_focus_margin: f32,
    /// Smallest half-extent of the pinned-planet viewport.
    pub min_focus_half_extent: f32,
    /// Fixed margin around the pinned sun.
    pub sun_focus_margin: f32,
    /// Fixed margin around the whole system in overview mode.
    pub overview_margin: f32,

    // -- Starfield --
    pub star_count: usize,
    pub nebula_count: usize,
    /// Extra area around the system that gets populated with stars.
    pub starfield_padding: f32,
    /// Steps between constellation spawn rounds.
    pub constellation_interval: u32,
    /// Stars sampled per constellation spawn round.
    pub constellation_sample: usize,
    /// Lifetime of a constellation link in steps.
    pub constellation_life: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,

            min_planet_radius: 60.0,
            max_planet_bonus: 8000.0,
            saturation_threshold: 200.0,
            planet_radius_noise: (-20.0, 30.0),
            orbit_start: 400.0,
            orbit_start_per_moon: 2.0,
            moon_footprint: 30.0,
            orbit_gap: (100.0, 500.0),
            min_sun_radius: 400.0,
            sun_radius_factor: 1.5,
            sun_clearance: 100.0,

            first_moon_gap: 60.0,
            moon_spacing: 15.0,
            moon_lane_gap: 10.0,
            min_moon_radius: 6.0,

            camera_ease: 0.05,
            planet_focus_margin: 0.1,
            min_focus_half_extent: 300.0,
            sun_focus_margin: 250.0,
            overview_margin: 300.0,

            star_count: 1200,
            nebula_count: 5,
            starfield_padding: 3000.0,
            constellation_interval: 150,
            constellation_sample: 60,
            constellation_life: 400,
        }
    }
}

impl MapConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
