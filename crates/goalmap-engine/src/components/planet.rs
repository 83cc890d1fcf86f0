use glam::Vec2;

use crate::api::config::MapConfig;
use crate::api::types::{BodyId, IdAllocator};
use crate::components::moon::{Moon, MoonDesc};
use crate::components::orbit::{Orbit, ScaleEase};
use crate::components::status::{InteractionState, Status, StatusOutcome, StatusUpdate};
use crate::data::SharedTask;
use crate::systems::shapes::{
    clip, generate_blob, generate_debris_field, generate_shatter, Debris, Polygon, Rng, Shatter,
};

/// Draw priority of a pinned planet (above everything).
pub const PINNED_Z: f32 = 1000.0;
/// Draw priority of a hovered planet (above every resting planet).
pub const HOVERED_Z: f32 = 500.0;
pub const HOVER_SCALE: f32 = 1.1;

/// Decoration alpha (0-255) at rest and while hovered / pinned.
pub const ORBIT_ALPHA: u8 = 40;
pub const ORBIT_ALPHA_HIGHLIGHT: u8 = 150;

const DASH_STEP: f32 = 0.5;
const DASH_WRAP: f32 = 100.0;
const DISC_SEGMENTS: usize = 64;

/// Layout decisions for one planet.
#[derive(Debug, Clone)]
pub struct PlanetDesc {
    pub task: SharedTask,
    pub radius: f32,
    pub orbit_radius: f32,
    /// Degrees.
    pub start_angle: f32,
}

/// Dashed ring drawn along one moon lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitDecoration {
    pub radius: f32,
    pub dash: f32,
    pub gap: f32,
}

impl OrbitDecoration {
    pub fn alpha(highlighted: bool) -> u8 {
        if highlighted {
            ORBIT_ALPHA_HIGHLIGHT
        } else {
            ORBIT_ALPHA
        }
    }
}

/// Cached planet geometry, centered on the planet.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanetSurface {
    /// Continents clipped to the disc, plus debris when some subtasks are cancelled.
    Living { continents: Vec<Polygon>, debris: Vec<Debris> },
    Shattered { shatter: Shatter, debris: Vec<Debris> },
}

impl PlanetSurface {
    pub fn debris(&self) -> &[Debris] {
        match self {
            PlanetSurface::Living { debris, .. } | PlanetSurface::Shattered { debris, .. } => debris,
        }
    }
}

/// A top-level task orbiting the sun. Owns its moons and their lanes.
#[derive(Debug, Clone)]
pub struct Planet {
    pub id: BodyId,
    task: SharedTask,
    status: Status,
    pub radius: f32,
    pub orbit: Orbit,
    /// Scene position.
    pub position: Vec2,
    state: InteractionState,
    hovered: bool,
    scale: ScaleEase,
    /// Resting draw priority; smaller planets rest above larger ones.
    base_z: f32,
    z: f32,
    /// Atmosphere dash phase.
    pub dash_offset: f32,
    opacity: f32,
    chaos_level: u32,
    pub moons: Vec<Moon>,
    pub orbit_decorations: Vec<OrbitDecoration>,
    pub surface: PlanetSurface,
    rng: Rng,
}

impl Planet {
    pub fn new(id: BodyId, desc: PlanetDesc, ids: &mut IdAllocator, mut rng: Rng, config: &MapConfig) -> Self {
        // Inner planets move faster, each with its own temperament and direction.
        let kepler = (1000.0 / desc.orbit_radius.max(1.0)).sqrt() * 0.05;
        let speed = kepler * rng.range(0.8, 1.5) * rng.sign();
        let orbit = Orbit::new(desc.orbit_radius, desc.start_angle, speed);
        let status = Status::of(&desc.task.borrow());

        let mut planet = Self {
            id,
            status,
            task: desc.task,
            radius: desc.radius,
            orbit,
            position: orbit.position(),
            state: InteractionState::Normal,
            hovered: false,
            scale: ScaleEase::new(),
            base_z: 0.0,
            z: 0.0,
            dash_offset: 0.0,
            opacity: 1.0,
            chaos_level: 0,
            moons: Vec::new(),
            orbit_decorations: Vec::new(),
            surface: PlanetSurface::Living {
                continents: Vec::new(),
                debris: Vec::new(),
            },
            rng,
        };
        planet.refresh_geometry();
        planet.spawn_moons(ids, config);
        planet
    }

    /// Lay moons out on consecutive lanes, each lane wide enough for its moon.
    fn spawn_moons(&mut self, ids: &mut IdAllocator, config: &MapConfig) {
        let children = self.task.borrow().children.clone();
        let count = children.len();
        let mut lane = self.radius + config.first_moon_gap;

        for (i, child) in children.into_iter().enumerate() {
            let desc = MoonDesc {
                task: child,
                parent: self.id,
                parent_radius: self.radius,
                sibling_count: count,
                start_angle: 360.0 / count as f32 * i as f32 + self.rng.range(0.0, 90.0),
                base_speed: self.rng.range(0.5, 1.5) * self.rng.sign(),
            };
            let mut moon = Moon::new(ids.next_id(), desc, self.rng.fork(), config.min_moon_radius);

            let clearance = moon.radius + config.moon_spacing;
            lane += clearance;
            moon.set_orbit_radius(lane);
            self.orbit_decorations.push(OrbitDecoration {
                radius: lane,
                dash: self.rng.range_int(5, 25) as f32,
                gap: self.rng.range_int(10, 30) as f32,
            });
            self.moons.push(moon);
            lane += clearance + config.moon_lane_gap;
        }
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

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_pinned(&self) -> bool {
        self.state == InteractionState::Pinned
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Hovered or pinned: lanes and atmosphere are drawn brighter.
    pub fn is_highlighted(&self) -> bool {
        self.hovered || self.is_pinned()
    }

    pub fn scale(&self) -> f32 {
        self.scale.current
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn base_z(&self) -> f32 {
        self.base_z
    }

    pub fn set_base_z(&mut self, z: f32) {
        self.base_z = z;
        if self.state == InteractionState::Normal {
            self.z = z;
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn chaos_level(&self) -> u32 {
        self.chaos_level
    }

    /// Explicit status change (planet menu). Cascades to every moon.
    pub fn set_status(&mut self, update: StatusUpdate, silent: bool) -> StatusOutcome {
        let update = update.normalized();
        let mut changed = false;

        if let Some(cancelled) = update.cancelled {
            if cancelled != self.status.cancelled {
                self.status.cancelled = cancelled;
                self.task.borrow_mut().cancelled = cancelled;
                for moon in &mut self.moons {
                    moon.set_status(StatusUpdate::cancelled(cancelled), true, silent);
                }
                self.refresh_geometry();
                changed = true;
            }
        }
        if let Some(done) = update.done {
            if done != self.status.done {
                self.status.done = done;
                self.task.borrow_mut().checked = done;
                for moon in &mut self.moons {
                    moon.set_status(StatusUpdate::done(done), true, silent);
                }
                changed = true;
            }
        }

        if changed {
            // Planets have no parent body to notify.
            StatusOutcome::applied(true, silent)
        } else {
            StatusOutcome::default()
        }
    }

    /// Recompute the aggregate after a moon changed: done iff every moon is
    /// done, cancelled iff every moon is cancelled. Only the planet's own
    /// fields are written; moons are left as they are.
    pub fn on_moon_changed(&mut self) -> StatusOutcome {
        if self.moons.is_empty() {
            return StatusOutcome::default();
        }
        let all_cancelled = self.moons.iter().all(|m| m.status().cancelled);
        let all_done = self.moons.iter().all(|m| m.status().done);
        let target = Status {
            done: all_done && !all_cancelled,
            cancelled: all_cancelled,
        };
        if target == self.status {
            return StatusOutcome::default();
        }

        let regenerate = target.cancelled != self.status.cancelled;
        self.status = target;
        {
            let mut task = self.task.borrow_mut();
            task.checked = target.done;
            task.cancelled = target.cancelled;
        }
        if regenerate {
            self.refresh_geometry();
        }
        StatusOutcome::applied(true, false)
    }

    /// Change one moon's status and settle the planet's aggregate.
    /// Returns `None` if the moon does not belong to this planet.
    pub fn set_moon_status(&mut self, moon: BodyId, update: StatusUpdate, silent: bool) -> Option<StatusOutcome> {
        let outcome = self
            .moons
            .iter_mut()
            .find(|m| m.id == moon)?
            .set_status(update, false, silent);
        if !outcome.notify_parent {
            return Some(outcome);
        }
        // The moon's own request already decides persistence.
        let aggregate = self.on_moon_changed();
        Some(StatusOutcome {
            changed: outcome.changed || aggregate.changed,
            notify_parent: false,
            request_save: outcome.request_save,
        })
    }

    pub fn moon(&self, id: BodyId) -> Option<&Moon> {
        self.moons.iter().find(|m| m.id == id)
    }

    pub fn moon_mut(&mut self, id: BodyId) -> Option<&mut Moon> {
        self.moons.iter_mut().find(|m| m.id == id)
    }

    pub fn advance(&mut self, running: bool) {
        if !running {
            return;
        }
        self.dash_offset -= DASH_STEP;
        if self.dash_offset < -DASH_WRAP {
            self.dash_offset = 0.0;
        }
        if self.state != InteractionState::Pinned {
            self.orbit.step();
            self.position = self.orbit.position();
        }
        self.scale.step();
        for moon in &mut self.moons {
            moon.advance(true);
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.state = InteractionState::Pinned;
            self.scale.target = 1.0;
            self.z = PINNED_Z;
        } else if self.hovered {
            // Pointer is still over the body; no fresh hover-enter will arrive.
            self.state = InteractionState::Hovered;
            self.scale.target = HOVER_SCALE;
            self.z = HOVERED_Z;
        } else {
            self.state = InteractionState::Normal;
            self.scale.target = 1.0;
            self.z = self.base_z;
        }
    }

    pub fn hover_enter(&mut self) {
        self.hovered = true;
        if self.state == InteractionState::Normal {
            self.state = InteractionState::Hovered;
            self.scale.target = HOVER_SCALE;
            self.z = HOVERED_Z;
        }
    }

    pub fn hover_leave(&mut self) {
        self.hovered = false;
        if self.state == InteractionState::Hovered {
            self.state = InteractionState::Normal;
            self.scale.target = 1.0;
            self.z = self.base_z;
        }
    }

    /// Rebuild the cached surface from radius and status. Also used for "reroll".
    pub fn refresh_geometry(&mut self) {
        let cancelled_children = self
            .task
            .borrow()
            .children
            .iter()
            .filter(|c| c.borrow().cancelled)
            .count() as u32;
        self.chaos_level = cancelled_children + if self.status.cancelled { 3 } else { 0 };

        let debris = if self.chaos_level > 0 {
            let count = self.rng.range_int(10, 20) + 8 * self.chaos_level;
            generate_debris_field(self.radius, count as usize, &mut self.rng)
        } else {
            Vec::new()
        };

        self.surface = if self.status.cancelled {
            PlanetSurface::Shattered {
                shatter: generate_shatter(self.radius, &mut self.rng),
                debris,
            }
        } else {
            PlanetSurface::Living {
                continents: self.continents(),
                debris,
            }
        };
    }

    fn continents(&mut self) -> Vec<Polygon> {
        let r = self.radius;
        let base = (r / 15.0) as u32;
        let count = self.rng.range_int(base.max(3), (base + 5).max(5));
        let disc = clip::circle_polygon(Vec2::ZERO, r, DISC_SEGMENTS);

        (0..count)
            .filter_map(|_| {
                let center = Vec2::new(self.rng.range(-0.8 * r, 0.8 * r), self.rng.range(-0.8 * r, 0.8 * r));
                let size = self.rng.range(0.15 * r, 0.35 * r);
                let points = self.rng.range_int(10, 20) as usize;
                let blob = generate_blob(center, size, points, &mut self.rng);
                let land = clip::clip_convex(&blob, &disc);
                (land.len() >= 3 && clip::area(&land) > clip::AREA_EPSILON).then_some(land)
            })
            .collect()
    }

    /// Farthest extent of the planet and its moons from the planet center.
    pub fn system_radius(&self) -> f32 {
        self.moons
            .iter()
            .map(|m| m.orbit.radius + m.radius)
            .fold(self.radius, f32::max)
    }

    /// Point at a fresh snapshot node. Moon nodes are swapped too when the
    /// subtask count still matches; returns `false` when it does not.
    pub fn replace_data(&mut self, task: SharedTask) -> bool {
        let children = task.borrow().children.clone();
        self.task = task;
        if children.len() != self.moons.len() {
            return false;
        }
        for (moon, child) in self.moons.iter_mut().zip(children) {
            moon.replace_data(child);
        }
        true
    }

    /// Re-read the planet's own status from its task. Returns whether anything differed.
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
}
