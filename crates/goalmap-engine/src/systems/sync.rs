//! Sync bridge: fold external task-tree edits into a live body graph.

use log::{debug, warn};

use crate::api::types::BodyId;
use crate::components::planet::Planet;
use crate::data::SharedTask;

/// What a reconcile pass touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchReport {
    pub planets_changed: usize,
    pub moons_changed: usize,
    /// Planets whose subtask count no longer matches their moons; their
    /// moons stay stale until the next rebuild.
    pub skipped: Vec<BodyId>,
}

/// A different number of top-level tasks invalidates the whole graph.
pub fn needs_rebuild(planets: &[Planet], tasks: &[SharedTask]) -> bool {
    planets.len() != tasks.len()
}

/// Patch planets in place from a snapshot with the same task count,
/// matching by position. Only fields that differ are touched.
pub fn patch_planets(planets: &mut [Planet], tasks: &[SharedTask]) -> PatchReport {
    let mut report = PatchReport::default();

    for (planet, task) in planets.iter_mut().zip(tasks) {
        let moons_match = planet.replace_data(task.clone());
        let was_cancelled = planet.status().cancelled;
        if planet.sync_with_data() {
            report.planets_changed += 1;
        }
        let regenerated = was_cancelled != planet.status().cancelled;
        if !moons_match {
            warn!(
                "planet {:?}: {} moons but {} subtasks, moon sync skipped until rebuild",
                planet.id,
                planet.moons.len(),
                task.borrow().children.len()
            );
            report.skipped.push(planet.id);
            continue;
        }
        let mut chaos_shifted = false;
        for moon in &mut planet.moons {
            let before = moon.status().cancelled;
            if moon.sync_with_data() {
                report.moons_changed += 1;
                chaos_shifted |= before != moon.status().cancelled;
            }
        }
        // Debris tracks cancelled subtasks; a shattered planet keeps its shards.
        if chaos_shifted && !regenerated && !planet.status().cancelled {
            planet.refresh_geometry();
        }
    }

    debug!(
        "patched map: {} planets and {} moons changed, {} skipped",
        report.planets_changed,
        report.moons_changed,
        report.skipped.len()
    );
    report
}
