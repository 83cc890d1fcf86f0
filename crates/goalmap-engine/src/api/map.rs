use chrono::NaiveDate;
use glam::Vec2;
use log::{debug, info};

use crate::api::config::MapConfig;
use crate::api::types::{BodyId, Color, IdAllocator};
use crate::components::status::{StatusOutcome, StatusUpdate};
use crate::core::scene::{Hit, Label, PinTarget, Scene};
use crate::core::time::FixedTimestep;
use crate::data::{clean_title, compute_progress, Note};
use crate::input::queue::{InputEvent, InputQueue, MenuAction, MenuTarget};
use crate::renderer::camera::{Camera, Rect};
use crate::systems::layout::build_system;
use crate::systems::shapes::Rng;
use crate::systems::starfield::Starfield;
use crate::systems::sync::{needs_rebuild, patch_planets, PatchReport};
use crate::systems::zodiac::ZodiacSign;
#[cfg(feature = "vectors")]
use crate::systems::render::{paint_map, PaintParams};
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorCanvas;

/// Surface size assumed until the host reports its own.
const DEFAULT_SCREEN: (f32, f32) = (1280.0, 720.0);
/// Starfield half extent for a map without planets.
const EMPTY_SKY_EXTENT: f32 = 2000.0;

/// One line of a body's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub label: String,
}

/// How `update_snapshot` folded the new data in.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconcile {
    /// Task count changed: every body was rebuilt with fresh ids.
    Rebuilt,
    /// Bodies were patched in place.
    Patched(PatchReport),
}

/// A Goal Map window: one note rendered as an orrery.
///
/// The host drives it with `tick(dt)` from whatever frame loop it has,
/// forwards pointer and menu input, and persists the note whenever the
/// save callback fires.
pub struct GoalMap {
    config: MapConfig,
    note: Note,
    accent: Color,
    ids: IdAllocator,
    rng: Rng,
    scene: Scene,
    starfield: Starfield,
    camera: Camera,
    timestep: FixedTimestep,
    input: InputQueue,
    running: bool,
    wallpaper: bool,
    zodiac: Option<ZodiacSign>,
    repaint: bool,
    save_callback: Option<Box<dyn FnMut()>>,
    save_requests: u64,
    #[cfg(feature = "vectors")]
    canvas: VectorCanvas,
}

impl GoalMap {
    /// Build the map for `note`. The same `seed` always yields the same sky
    /// and the same planet shapes.
    pub fn open(note: Note, accent: Color, config: MapConfig, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut ids = IdAllocator::new();
        let starfield = Starfield::new(rng.fork(), &config);
        let scene = Scene::new(build_system(&note, &config, &mut ids, &mut rng));
        let camera = Camera::new(DEFAULT_SCREEN.0, DEFAULT_SCREEN.1, config.camera_ease);
        let timestep = FixedTimestep::new(config.fixed_dt);

        let mut map = Self {
            config,
            note,
            accent,
            ids,
            rng,
            scene,
            starfield,
            camera,
            timestep,
            input: InputQueue::new(),
            running: true,
            wallpaper: false,
            zodiac: None,
            repaint: true,
            save_callback: None,
            save_requests: 0,
            #[cfg(feature = "vectors")]
            canvas: VectorCanvas::new(),
        };
        map.populate_sky();
        info!(
            "goal map opened: \"{}\" with {} tasks and {} subtasks",
            map.scene.sun.title,
            map.note.tasks.len(),
            map.note.subtask_count()
        );
        map
    }

    /// Called after every status change that should be persisted.
    pub fn set_save_callback(&mut self, callback: impl FnMut() + 'static) {
        self.save_callback = Some(Box::new(callback));
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn accent(&self) -> Color {
        self.accent
    }

    pub fn set_accent(&mut self, accent: Color) {
        self.accent = accent;
        self.repaint = true;
    }

    // -- Simulation --

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply every queued input event.
    pub fn handle_input(&mut self) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerMove { x, y } => {
                    self.pointer_move(Vec2::new(x, y));
                }
                InputEvent::PointerDown { x, y } => {
                    self.pointer_down(Vec2::new(x, y));
                }
                InputEvent::Menu { target, action } => {
                    self.menu_action(target, action);
                }
                InputEvent::ToggleWallpaper => self.set_wallpaper_mode(!self.wallpaper),
                InputEvent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    /// Advance by `dt` seconds of host time. Returns the number of fixed
    /// steps simulated.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.handle_input();
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.step();
        }
        if steps > 0 {
            self.repaint = true;
        }
        steps
    }

    fn step(&mut self) {
        self.starfield.advance();
        self.scene.advance(self.running);
        let target = self.scene.focus_rect(&self.config);
        self.camera.follow(target);
    }

    /// Freeze orbital motion and easing (e.g. while the window is hidden).
    /// The starfield keeps drifting.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // -- Reconciliation --

    /// Fold fresh task data into the live map. A different number of
    /// top-level tasks rebuilds everything; otherwise bodies are patched in
    /// place and keep their identity. Never requests a save.
    pub fn update_snapshot(&mut self, note: Note) -> Reconcile {
        self.note = note;
        if needs_rebuild(&self.scene.planets, &self.note.tasks) {
            debug!(
                "task count changed ({} -> {}), rebuilding",
                self.scene.planets.len(),
                self.note.tasks.len()
            );
            self.rebuild();
            return Reconcile::Rebuilt;
        }

        let report = patch_planets(&mut self.scene.planets, &self.note.tasks);
        self.scene.sun.title = clean_title(&self.note.title);
        self.refresh_progress();
        self.repaint = true;
        Reconcile::Patched(report)
    }

    /// Throw the body graph away and build it again from the current note.
    pub fn rebuild(&mut self) {
        let system = build_system(&self.note, &self.config, &mut self.ids, &mut self.rng);
        self.scene.replace(system);
        self.starfield.clear();
        self.populate_sky();
        self.camera.unplace();
        self.timestep.reset();
        self.repaint = true;
    }

    fn populate_sky(&mut self) {
        let extent = self
            .scene
            .planets
            .iter()
            .map(|p| p.orbit.radius + p.system_radius())
            .fold(None, |acc: Option<f32>, r| Some(acc.map_or(r, |a| a.max(r))))
            .unwrap_or(EMPTY_SKY_EXTENT);
        self.starfield.populate(Vec2::ZERO, extent);
    }

    fn refresh_progress(&mut self) {
        self.scene.sun.set_progress(compute_progress(&self.note.tasks));
    }

    // -- Pointer --

    /// Hover whatever sits under the screen point.
    pub fn pointer_move(&mut self, screen: Vec2) -> Option<Hit> {
        let hit = self.scene.hit_test(self.camera.screen_to_world(screen));
        if hit != self.scene.hovered() {
            self.scene.set_hover(hit);
            self.repaint = true;
        }
        hit
    }

    /// Click: planets and the sun toggle their pin, moons toggle their
    /// title, empty space unpins.
    pub fn pointer_down(&mut self, screen: Vec2) -> Option<Hit> {
        let hit = self.scene.hit_test(self.camera.screen_to_world(screen));
        match hit {
            Some(Hit::Sun) => self.scene.toggle_pin(PinTarget::Sun),
            Some(Hit::Planet(id)) => self.scene.toggle_pin(PinTarget::Planet(id)),
            Some(Hit::Moon { planet, moon }) => {
                if let Some(m) = self.scene.planet_mut(planet).and_then(|p| p.moon_mut(moon)) {
                    m.toggle_title_pin();
                }
            }
            None => self.scene.pin(None),
        }
        self.repaint = true;
        hit
    }

    pub fn pin(&mut self, target: Option<PinTarget>) {
        self.scene.pin(target);
        self.repaint = true;
    }

    // -- Status --

    /// Explicit planet status change. Cascades to its moons.
    pub fn set_planet_status(&mut self, id: BodyId, update: StatusUpdate) -> StatusOutcome {
        let outcome = match self.scene.planet_mut(id) {
            Some(planet) => planet.set_status(update, false),
            None => return StatusOutcome::default(),
        };
        self.settle(outcome);
        outcome
    }

    /// Moon status change. The owning planet re-aggregates its own status.
    pub fn set_moon_status(&mut self, id: BodyId, update: StatusUpdate) -> StatusOutcome {
        let Some(parent) = self.scene.moon(id).map(|(_, m)| m.parent) else {
            return StatusOutcome::default();
        };
        let Some(planet) = self.scene.planet_mut(parent) else {
            return StatusOutcome::default();
        };
        let Some(outcome) = planet.set_moon_status(id, update, false) else {
            return StatusOutcome::default();
        };
        // Cancelled subtasks feed the planet's debris field.
        if outcome.changed && update.cancelled.is_some() && !planet.status().cancelled {
            planet.refresh_geometry();
        }
        self.settle(outcome);
        outcome
    }

    fn settle(&mut self, outcome: StatusOutcome) {
        if outcome.changed {
            self.refresh_progress();
            self.repaint = true;
        }
        if outcome.request_save {
            self.request_save();
        }
    }

    fn request_save(&mut self) {
        self.save_requests += 1;
        if let Some(callback) = self.save_callback.as_mut() {
            callback();
        }
    }

    /// Number of save requests issued so far.
    pub fn save_requests(&self) -> u64 {
        self.save_requests
    }

    // -- Context menu --

    /// Entries the shell should offer for `target`. Unknown bodies get none.
    pub fn menu_entries(&self, target: MenuTarget) -> Vec<MenuEntry> {
        let entry = |action, label: &str| MenuEntry {
            action,
            label: label.to_string(),
        };
        let status = match target {
            MenuTarget::Planet(id) => self.scene.planet(id).map(|p| p.status()),
            MenuTarget::Moon(id) => self.scene.moon(id).map(|(_, m)| m.status()),
            MenuTarget::Map => {
                let label = if self.wallpaper { "Exit wallpaper mode" } else { "Wallpaper mode" };
                return vec![entry(MenuAction::ToggleWallpaper, label)];
            }
        };
        let Some(status) = status else {
            return Vec::new();
        };
        vec![
            entry(
                MenuAction::ToggleDone,
                if status.done { "Mark as not done" } else { "Mark as done" },
            ),
            entry(
                MenuAction::ToggleCancelled,
                if status.cancelled { "Restore" } else { "Cancel" },
            ),
            entry(MenuAction::Reroll, "Reroll shape"),
        ]
    }

    /// Apply a context-menu choice. Returns false if the target is gone or
    /// the action does not apply to it.
    pub fn menu_action(&mut self, target: MenuTarget, action: MenuAction) -> bool {
        match (target, action) {
            (_, MenuAction::ToggleWallpaper) => {
                self.set_wallpaper_mode(!self.wallpaper);
                true
            }
            (MenuTarget::Map, _) => false,
            (MenuTarget::Planet(id), MenuAction::Reroll) => match self.scene.planet_mut(id) {
                Some(planet) => {
                    planet.refresh_geometry();
                    self.repaint = true;
                    true
                }
                None => false,
            },
            (MenuTarget::Moon(id), MenuAction::Reroll) => {
                let parent = self.scene.moon(id).map(|(p, _)| p.id);
                match parent.and_then(|p| self.scene.planet_mut(p)).and_then(|p| p.moon_mut(id)) {
                    Some(moon) => {
                        moon.refresh_geometry();
                        self.repaint = true;
                        true
                    }
                    None => false,
                }
            }
            (MenuTarget::Planet(id), toggle) => {
                let Some(status) = self.scene.planet(id).map(|p| p.status()) else {
                    return false;
                };
                self.set_planet_status(id, toggle_update(toggle, status.done, status.cancelled));
                true
            }
            (MenuTarget::Moon(id), toggle) => {
                let Some(status) = self.scene.moon(id).map(|(_, m)| m.status()) else {
                    return false;
                };
                self.set_moon_status(id, toggle_update(toggle, status.done, status.cancelled));
                true
            }
        }
    }

    // -- Presentation --

    /// In wallpaper mode the map paints no background of its own.
    pub fn set_wallpaper_mode(&mut self, on: bool) {
        if on != self.wallpaper {
            info!("wallpaper mode {}", if on { "on" } else { "off" });
            self.wallpaper = on;
            self.repaint = true;
        }
    }

    pub fn wallpaper_mode(&self) -> bool {
        self.wallpaper
    }

    /// Pick the zodiac overlay for the host's current date.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.zodiac = Some(ZodiacSign::for_date(date));
        self.repaint = true;
    }

    pub fn zodiac(&self) -> Option<ZodiacSign> {
        self.zodiac
    }

    pub fn progress(&self) -> f32 {
        self.scene.sun.progress()
    }

    /// Visible scene rectangle.
    pub fn viewport(&self) -> Rect {
        self.camera.viewport()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.repaint = true;
    }

    /// True once per change that needs a new frame.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    pub fn labels(&self) -> Vec<Label> {
        self.scene.labels()
    }

    /// Tessellate the current frame.
    #[cfg(feature = "vectors")]
    pub fn paint(&mut self) -> &VectorCanvas {
        let params = PaintParams {
            scene: &self.scene,
            starfield: &self.starfield,
            camera: &self.camera,
            accent: self.accent,
            wallpaper: self.wallpaper,
            zodiac: self.zodiac,
        };
        paint_map(&params, &mut self.canvas);
        &self.canvas
    }

    /// The last painted frame.
    #[cfg(feature = "vectors")]
    pub fn canvas(&self) -> &VectorCanvas {
        &self.canvas
    }
}

fn toggle_update(action: MenuAction, done: bool, cancelled: bool) -> StatusUpdate {
    match action {
        // Finishing a cancelled body revives it.
        MenuAction::ToggleDone if cancelled => StatusUpdate {
            done: Some(true),
            cancelled: Some(false),
        },
        MenuAction::ToggleDone => StatusUpdate::done(!done),
        MenuAction::ToggleCancelled if !cancelled => StatusUpdate {
            done: Some(false),
            cancelled: Some(true),
        },
        MenuAction::ToggleCancelled => StatusUpdate::cancelled(false),
        _ => StatusUpdate::default(),
    }
}
