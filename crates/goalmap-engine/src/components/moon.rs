use glam::Vec2;

use crate::api::types::BodyId;
use crate::components::orbit::Orbit;
use crate::components::status::{Status, StatusOutcome, StatusUpdate};
use crate::data::SharedTask;
use crate::systems::shapes::{
    clip, generate_blob, generate_crater, generate_shatter, Crater, Polygon, Rng, Shatter,
};

/// Moons above this radius get surface detail.
const DETAIL_RADIUS: f32 = 8.0;
/// Segments of the disc used to clip maria.
const DISC_SEGMENTS: usize = 32;

/// Sibling count after which moons start to shrink.
const CROWD_THRESHOLD: usize = 4;

/// Everything a planet knows when it spawns one of its moons.
#[derive(Debug, Clone)]
pub struct MoonDesc {
    pub task: SharedTask,
    pub parent: BodyId,
    pub parent_radius: f32,
    pub sibling_count: usize,
    /// Degrees.
    pub start_angle: f32,
    /// Signed base speed, scaled down by the moon itself.
    pub base_speed: f32,
}

/// Cached surface geometry, centered on the moon.
#[derive(Debug, Clone, PartialEq)]
pub enum MoonSurface {
    Intact { craters: Vec<Crater>, maria: Vec<Polygon> },
    Broken { shatter: Shatter, dust: Vec<Polygon> },
}

/// A subtask orbiting its planet.
///
/// `parent` is a handle used only to route the "my status changed" event
/// back to the owning planet; the planet owns the moon.
#[derive(Debug, Clone)]
pub struct Moon {
    pub id: BodyId,
    pub parent: BodyId,
    task: SharedTask,
    status: Status,
    pub radius: f32,
    pub orbit: Orbit,
    /// Position relative to the parent planet.
    pub position: Vec2,
    hovered: bool,
    title_pinned: bool,
    pub surface: MoonSurface,
    rng: Rng,
}

/// Moon sizing policy: a random share of the parent, damped when crowded,
/// plus a small bonus for long labels. Clamped to
/// `[min_radius, 0.45 * parent_radius]`, the minimum winning for tiny parents.
pub fn moon_radius(
    parent_radius: f32,
    sibling_count: usize,
    text_len: usize,
    min_radius: f32,
    rng: &mut Rng,
) -> f32 {
    let share = rng.range(0.10, 0.28);
    let crowd = if sibling_count > CROWD_THRESHOLD {
        (1.0 - (sibling_count - CROWD_THRESHOLD) as f32 * 0.03).max(0.5)
    } else {
        1.0
    };
    let label_bonus = text_len.min(15) as f32 * 0.3 * crowd;
    let noise = rng.range(-2.0, 8.0);

    let r = parent_radius * share * crowd + label_bonus + noise;
    r.min(parent_radius * 0.45).max(min_radius)
}

impl Moon {
    pub fn new(id: BodyId, desc: MoonDesc, mut rng: Rng, min_radius: f32) -> Self {
        let (status, text_len) = {
            let task = desc.task.borrow();
            (Status::of(&task), task.text.chars().count())
        };
        let radius = moon_radius(desc.parent_radius, desc.sibling_count, text_len, min_radius, &mut rng);
        let speed = desc.base_speed * rng.range(0.8, 1.2) / 10.0;

        let mut moon = Self {
            id,
            parent: desc.parent,
            task: desc.task,
            status,
            radius,
            orbit: Orbit::new(0.0, desc.start_angle, speed),
            position: Vec2::ZERO,
            hovered: false,
            title_pinned: false,
            surface: MoonSurface::Intact {
                craters: Vec::new(),
                maria: Vec::new(),
            },
            rng,
        };
        moon.refresh_geometry();
        moon
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn task(&self) -> &SharedTask {
        &self.task
    }

    pub fn text(&self) -> String {
        self.task.borrow().text.clone()
    }

    /// Place the moon on its lane and compute its position.
    pub fn set_orbit_radius(&mut self, radius: f32) {
        self.orbit.radius = radius;
        self.position = self.orbit.position();
    }

    /// Apply a partial status change, writing through to the task.
    ///
    /// `from_parent` marks a top-down cascade, which must not bounce back up
    /// to the planet. `silent` suppresses the save request.
    pub fn set_status(&mut self, update: StatusUpdate, from_parent: bool, silent: bool) -> StatusOutcome {
        let update = update.normalized();
        let mut changed = false;

        if let Some(cancelled) = update.cancelled {
            if cancelled != self.status.cancelled {
                self.status.cancelled = cancelled;
                self.task.borrow_mut().cancelled = cancelled;
                self.refresh_geometry();
                changed = true;
            }
        }
        if let Some(done) = update.done {
            if done != self.status.done {
                self.status.done = done;
                self.task.borrow_mut().checked = done;
                changed = true;
            }
        }

        if changed {
            StatusOutcome::applied(from_parent, silent)
        } else {
            StatusOutcome::default()
        }
    }

    /// Swap in the node a fresh snapshot holds for this moon.
    pub fn replace_data(&mut self, task: SharedTask) {
        self.task = task;
    }

    /// Re-read status from the task data. Returns whether anything differed.
    pub fn sync_with_data(&mut self) -> bool {
        let fresh = Status::of(&self.task.borrow());
        if fresh == self.status {
            return false;
        }
        let regenerate = fresh.cancelled != self.status.cancelled;
        self.status = fresh;
        if regenerate {
            self.refresh_geometry();
        }
        true
    }

    pub fn advance(&mut self, running: bool) {
        if !running {
            return;
        }
        self.orbit.step();
        self.position = self.orbit.position();
    }

    /// Rebuild the cached surface from the current radius and status.
    pub fn refresh_geometry(&mut self) {
        self.surface = if self.status.cancelled {
            MoonSurface::Broken {
                shatter: generate_shatter(self.radius, &mut self.rng),
                dust: cosmic_dust(self.radius, &mut self.rng),
            }
        } else if self.radius > DETAIL_RADIUS {
            let count = self.rng.range_int(2, 6);
            let craters = (0..count)
                .map(|_| generate_crater(self.radius, &mut self.rng))
                .collect();
            MoonSurface::Intact {
                craters,
                maria: self.maria(),
            }
        } else {
            MoonSurface::Intact {
                craters: Vec::new(),
                maria: Vec::new(),
            }
        };
    }

    fn maria(&mut self) -> Vec<Polygon> {
        let r = self.radius;
        let disc = clip::circle_polygon(Vec2::ZERO, r, DISC_SEGMENTS);
        (0..self.rng.range_int(0, 2))
            .filter_map(|_| {
                let center = Vec2::new(self.rng.range(-0.4 * r, 0.4 * r), self.rng.range(-0.4 * r, 0.4 * r));
                let size = self.rng.range(0.2 * r, 0.35 * r);
                let points = self.rng.range_int(8, 12) as usize;
                let blob = generate_blob(center, size, points, &mut self.rng);
                let inside = clip::clip_convex(&blob, &disc);
                (inside.len() >= 3).then_some(inside)
            })
            .collect()
    }

    // -- Pointer interaction --

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Clicking a moon pins (or unpins) its label.
    pub fn toggle_title_pin(&mut self) {
        self.title_pinned = !self.title_pinned;
    }

    pub fn is_title_pinned(&self) -> bool {
        self.title_pinned
    }

    pub fn title_visible(&self) -> bool {
        self.title_pinned || self.hovered
    }
}

/// A handful of tiny triangles drifting around a broken moon.
fn cosmic_dust(radius: f32, rng: &mut Rng) -> Vec<Polygon> {
    (0..rng.range_int(5, 15))
        .map(|_| {
            let at = Vec2::from_angle(rng.angle()) * rng.range(radius * 1.2, radius * 3.0);
            let s = rng.range(0.5, 3.0);
            vec![at, at + Vec2::new(s, s), at + Vec2::new(-s, s / 2.0)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TaskNode;

    fn spawn(task: TaskNode, seed: u64) -> Moon {
        let desc = MoonDesc {
            task: task.shared(),
            parent: BodyId(1),
            parent_radius: 100.0,
            sibling_count: 3,
            start_angle: 0.0,
            base_speed: 1.0,
        };
        let mut moon = Moon::new(BodyId(2), desc, Rng::new(seed), 6.0);
        moon.set_orbit_radius(200.0);
        moon
    }

    #[test]
    fn radius_respects_bounds() {
        let mut rng = Rng::new(3);
        for siblings in [1, 5, 40] {
            for parent in [10.0, 60.0, 400.0] {
                let r = moon_radius(parent, siblings, 30, 6.0, &mut rng);
                assert!(r >= 6.0);
                assert!(r <= (parent * 0.45).max(6.0) + 1e-4);
            }
        }
    }

    #[test]
    fn crowding_shrinks_moons() {
        let mean = |siblings| {
            let mut rng = Rng::new(11);
            (0..500).map(|_| moon_radius(300.0, siblings, 0, 6.0, &mut rng)).sum::<f32>() / 500.0
        };
        assert!(mean(30) < mean(2));
    }

    #[test]
    fn status_writes_through() {
        let mut moon = spawn(TaskNode::new("Hotel"), 1);
        let out = moon.set_status(StatusUpdate::done(true), false, false);
        assert!(out.changed && out.notify_parent && out.request_save);
        assert!(moon.task().borrow().checked);

        let again = moon.set_status(StatusUpdate::done(true), false, false);
        assert_eq!(again, StatusOutcome::default());
    }

    #[test]
    fn cascade_does_not_bounce_back() {
        let mut moon = spawn(TaskNode::new("Hotel"), 1);
        let out = moon.set_status(StatusUpdate::cancelled(true), true, true);
        assert!(out.changed);
        assert!(!out.notify_parent);
        assert!(!out.request_save);
        assert!(moon.task().borrow().cancelled);
    }

    #[test]
    fn cancelling_shatters_the_surface() {
        let mut moon = spawn(TaskNode::new("A long subtask label"), 8);
        assert!(matches!(moon.surface, MoonSurface::Intact { .. }));
        moon.set_status(StatusUpdate::cancelled(true), false, false);
        assert!(matches!(moon.surface, MoonSurface::Broken { .. }));
        assert!(!moon.status().done);
        moon.set_status(StatusUpdate::cancelled(false), false, false);
        assert!(matches!(moon.surface, MoonSurface::Intact { .. }));
    }

    #[test]
    fn sync_reads_external_edits() {
        let mut moon = spawn(TaskNode::new("Hotel"), 2);
        assert!(!moon.sync_with_data());
        moon.task().borrow_mut().cancelled = true;
        assert!(moon.sync_with_data());
        assert!(moon.status().cancelled);
        assert!(matches!(moon.surface, MoonSurface::Broken { .. }));
    }

    #[test]
    fn advance_moves_along_orbit() {
        let mut moon = spawn(TaskNode::new("Hotel"), 4);
        let before = moon.position;
        moon.advance(false);
        assert_eq!(moon.position, before);
        for _ in 0..50 {
            moon.advance(true);
        }
        assert!((moon.position.length() - 200.0).abs() < 1e-2);
        assert_ne!(moon.position, before);
    }

    #[test]
    fn title_pin_toggles() {
        let mut moon = spawn(TaskNode::new("Hotel"), 5);
        assert!(!moon.title_visible());
        moon.set_hovered(true);
        assert!(moon.title_visible());
        moon.set_hovered(false);
        moon.toggle_title_pin();
        assert!(moon.title_visible());
    }
}
