//! Layout engine: planet sizes, orbit packing and the sun that dominates them.

use log::debug;

use crate::api::config::MapConfig;
use crate::api::types::IdAllocator;
use crate::components::planet::{Planet, PlanetDesc};
use crate::components::sun::Sun;
use crate::data::{clean_title, compute_progress, Note, SharedTask};
use crate::systems::shapes::Rng;

/// Placement decided for one top-level task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSlot {
    pub radius: f32,
    pub orbit_radius: f32,
    /// Half of the orbit band (planet radius plus moon footprint).
    pub half_width: f32,
    /// Degrees.
    pub start_angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub slots: Vec<PlanetSlot>,
    pub sun_radius: f32,
}

/// A freshly built body graph.
#[derive(Debug, Clone)]
pub struct BuiltSystem {
    pub sun: Sun,
    pub planets: Vec<Planet>,
}

fn moon_counts(tasks: &[SharedTask]) -> Vec<usize> {
    tasks.iter().map(|t| t.borrow().children.len()).collect()
}

/// Total subtask count, falling back to the task count when nothing has subtasks.
pub fn total_moons(counts: &[usize]) -> usize {
    match counts.iter().sum() {
        0 => counts.len(),
        n => n,
    }
}

/// Workload-weighted planet radii: each task grows with its share of all
/// subtasks, damped while the whole note is still small.
pub fn planet_radii(counts: &[usize], config: &MapConfig, rng: &mut Rng) -> Vec<f32> {
    let total = total_moons(counts).max(1) as f32;
    let density = (total / config.saturation_threshold).min(1.0);
    let (noise_lo, noise_hi) = config.planet_radius_noise;

    counts
        .iter()
        .map(|&n| {
            let share = n as f32 / total;
            let r = config.min_planet_radius
                + share * config.max_planet_bonus * density
                + rng.range(noise_lo, noise_hi);
            r.max(config.min_planet_radius)
        })
        .collect()
}

pub fn sun_radius(largest_planet: f32, config: &MapConfig) -> f32 {
    (largest_planet * config.sun_radius_factor).max(config.min_sun_radius)
}

/// Size every planet and pack the orbit bands outward, in task order.
pub fn plan_layout(tasks: &[SharedTask], config: &MapConfig, rng: &mut Rng) -> Layout {
    let counts = moon_counts(tasks);
    let radii = planet_radii(&counts, config, rng);
    let largest = radii.iter().copied().fold(0.0, f32::max);
    let sun_radius = sun_radius(largest, config);

    let mut orbit = (config.orbit_start + config.orbit_start_per_moon * total_moons(&counts) as f32)
        .max(sun_radius + config.sun_clearance);
    let (gap_lo, gap_hi) = config.orbit_gap;

    let slots = radii
        .iter()
        .zip(&counts)
        .map(|(&radius, &moons)| {
            let half_width = (radius + moons as f32 * config.moon_footprint) / 2.0;
            orbit += half_width + rng.range(gap_lo, gap_hi);
            let slot = PlanetSlot {
                radius,
                orbit_radius: orbit,
                half_width,
                start_angle: rng.range(0.0, 360.0),
            };
            orbit += half_width;
            slot
        })
        .collect();

    Layout { slots, sun_radius }
}

/// Resting draw priority: the smaller the planet, the higher it floats.
pub fn base_z(radius: f32, largest: f32) -> f32 {
    10.0 + (largest - radius)
}

/// Instantiate the sun and planets for a note.
pub fn build_system(note: &Note, config: &MapConfig, ids: &mut IdAllocator, rng: &mut Rng) -> BuiltSystem {
    let layout = plan_layout(&note.tasks, config, rng);

    let mut sun = Sun::new(ids.next_id(), clean_title(&note.title), layout.sun_radius);
    sun.set_progress(compute_progress(&note.tasks));

    let mut planets: Vec<Planet> = note
        .tasks
        .iter()
        .zip(&layout.slots)
        .map(|(task, slot)| {
            let desc = PlanetDesc {
                task: task.clone(),
                radius: slot.radius,
                orbit_radius: slot.orbit_radius,
                start_angle: slot.start_angle,
            };
            let id = ids.next_id();
            Planet::new(id, desc, ids, rng.fork(), config)
        })
        .collect();

    let largest = planets.iter().map(|p| p.radius).fold(0.0, f32::max);
    for planet in &mut planets {
        planet.set_base_z(base_z(planet.radius, largest));
    }

    debug!(
        "built map: {} planets, {} moons, sun radius {:.0}",
        planets.len(),
        planets.iter().map(|p| p.moons.len()).sum::<usize>(),
        sun.radius
    );
    BuiltSystem { sun, planets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TaskNode;

    fn task(moons: usize) -> TaskNode {
        TaskNode::new("task").with_children((0..moons).map(|i| TaskNode::new(format!("sub {i}"))))
    }

    #[test]
    fn bands_never_overlap() {
        let note = Note::new("n", [task(0), task(7), task(2), task(30), task(1), task(0)]);
        let cfg = MapConfig::default();
        for seed in 0..20 {
            let layout = plan_layout(&note.tasks, &cfg, &mut Rng::new(seed));
            for pair in layout.slots.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(b.orbit_radius > a.orbit_radius);
                assert!(b.orbit_radius - a.orbit_radius >= a.half_width + b.half_width);
            }
            let first = layout.slots[0];
            assert!(first.orbit_radius - first.half_width >= layout.sun_radius + cfg.sun_clearance);
        }
    }

    #[test]
    fn bigger_workload_means_bigger_planet() {
        let cfg = MapConfig::default();
        let radii = planet_radii(&[1, 150], &cfg, &mut Rng::new(4));
        assert!(radii[1] > radii[0]);
        assert!(radii.iter().all(|&r| r >= cfg.min_planet_radius));
    }

    #[test]
    fn childless_note_uses_task_count() {
        assert_eq!(total_moons(&[0, 0, 0]), 3);
        assert_eq!(total_moons(&[2, 0, 1]), 3);
        assert_eq!(total_moons(&[]), 0);
        let radii = planet_radii(&[0, 0], &MapConfig::default(), &mut Rng::new(1));
        assert!(radii.iter().all(|r| r.is_finite()));
    }

    #[test]
    fn sun_dominates() {
        let cfg = MapConfig::default();
        assert_eq!(sun_radius(100.0, &cfg), cfg.min_sun_radius);
        assert_eq!(sun_radius(600.0, &cfg), 900.0);
    }

    #[test]
    fn empty_note_is_sun_only() {
        let mut ids = IdAllocator::new();
        let sys = build_system(&Note::new("Empty", []), &MapConfig::default(), &mut ids, &mut Rng::new(2));
        assert!(sys.planets.is_empty());
        assert_eq!(sys.sun.progress(), 0.0);
        assert_eq!(sys.sun.radius, MapConfig::default().min_sun_radius);
    }

    #[test]
    fn smaller_planets_rest_higher() {
        let note = Note::new("n", [task(40), task(1), task(10)]);
        let mut ids = IdAllocator::new();
        let sys = build_system(&note, &MapConfig::default(), &mut ids, &mut Rng::new(9));
        let mut by_size = sys.planets.clone();
        by_size.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        for pair in by_size.windows(2) {
            assert!(pair[0].z() >= pair[1].z());
        }
        let largest = by_size.last().unwrap();
        assert_eq!(largest.z(), 10.0);
    }

    #[test]
    fn build_uses_clean_title_and_progress() {
        let note = Note::new(
            "Trip - draft",
            [
                TaskNode::new("Pack").checked(true),
                TaskNode::new("Book").with_children([TaskNode::new("Hotel").checked(true), TaskNode::new("Train")]),
            ],
        );
        let mut ids = IdAllocator::new();
        let sys = build_system(&note, &MapConfig::default(), &mut ids, &mut Rng::new(3));
        assert_eq!(sys.sun.title, "Trip");
        assert!((sys.sun.progress() - 0.75).abs() < 1e-6);
        assert_eq!(sys.planets.len(), 2);
        assert_eq!(sys.planets[1].moons.len(), 2);
    }
}
