use glam::Vec2;

use crate::api::config::MapConfig;
use crate::api::types::BodyId;
use crate::components::moon::Moon;
use crate::components::planet::Planet;
use crate::components::sun::Sun;
use crate::renderer::camera::Rect;
use crate::systems::layout::BuiltSystem;

/// Sun opacity while a planet holds the focus.
pub const SUN_FADED: f32 = 0.1;
/// Opacity of planets that do not hold the focus.
pub const PLANET_FADED: f32 = 0.15;

/// The one body allowed to hold camera focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinTarget {
    Sun,
    Planet(BodyId),
}

/// Body under a scene point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Sun,
    Planet(BodyId),
    Moon { planet: BodyId, moon: BodyId },
}

/// Text to draw next to a body. Rendering text is left to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Scene position of the label's top center.
    pub anchor: Vec2,
    /// Font size in scene units.
    pub size: f32,
    pub struck: bool,
    /// Drawn bright with a backdrop (hovered / pinned / done).
    pub emphasized: bool,
    pub opacity: f32,
}

/// The live body graph: one sun, its planets and (through them) moons.
/// Owns the pin and hover state.
#[derive(Debug, Clone)]
pub struct Scene {
    pub sun: Sun,
    pub planets: Vec<Planet>,
    pinned: Option<PinTarget>,
    hovered: Option<Hit>,
}

impl Scene {
    pub fn new(system: BuiltSystem) -> Self {
        Self {
            sun: system.sun,
            planets: system.planets,
            pinned: None,
            hovered: None,
        }
    }

    /// Swap in a rebuilt graph. Pin and hover referred to the old bodies
    /// and are dropped.
    pub fn replace(&mut self, system: BuiltSystem) {
        *self = Scene::new(system);
    }

    pub fn planet(&self, id: BodyId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    pub fn planet_mut(&mut self, id: BodyId) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|p| p.id == id)
    }

    /// Find a moon and the planet that owns it.
    pub fn moon(&self, id: BodyId) -> Option<(&Planet, &Moon)> {
        self.planets
            .iter()
            .find_map(|p| p.moon(id).map(|m| (p, m)))
    }

    pub fn moon_count(&self) -> usize {
        self.planets.iter().map(|p| p.moons.len()).sum()
    }

    // -- Pinning --

    pub fn pinned(&self) -> Option<PinTarget> {
        self.pinned
    }

    pub fn pinned_planet(&self) -> Option<&Planet> {
        match self.pinned {
            Some(PinTarget::Planet(id)) => self.planet(id),
            _ => None,
        }
    }

    /// Pin `target` (or nothing), unpinning every other body and fading
    /// whatever is out of focus. An unknown planet id unpins everything.
    pub fn pin(&mut self, target: Option<PinTarget>) {
        let target = match target {
            Some(PinTarget::Planet(id)) if self.planet(id).is_none() => None,
            other => other,
        };
        self.pinned = target;

        let focused_planet = match target {
            Some(PinTarget::Planet(id)) => Some(id),
            _ => None,
        };
        self.sun.set_pinned(target == Some(PinTarget::Sun));
        self.sun.set_opacity(if focused_planet.is_some() { SUN_FADED } else { 1.0 });

        for planet in &mut self.planets {
            let focused = focused_planet == Some(planet.id);
            planet.set_pinned(focused);
            let opacity = match target {
                None => 1.0,
                Some(_) if focused => 1.0,
                Some(_) => PLANET_FADED,
            };
            planet.set_opacity(opacity);
        }
    }

    /// Click on a pinnable body: pin it, or unpin it if it already is.
    pub fn toggle_pin(&mut self, target: PinTarget) {
        if self.pinned == Some(target) {
            self.pin(None);
        } else {
            self.pin(Some(target));
        }
    }

    // -- Pointer --

    pub fn hovered(&self) -> Option<Hit> {
        self.hovered
    }

    /// Topmost body at scene point `p`: planets by descending draw
    /// priority (each planet's moons above the planet itself), then the sun.
    pub fn hit_test(&self, p: Vec2) -> Option<Hit> {
        let mut order: Vec<&Planet> = self.planets.iter().collect();
        order.sort_by(|a, b| b.z().total_cmp(&a.z()));

        for planet in order {
            let scale = planet.scale();
            for moon in planet.moons.iter().rev() {
                let center = planet.position + moon.position * scale;
                if center.distance(p) <= moon.radius * scale {
                    return Some(Hit::Moon {
                        planet: planet.id,
                        moon: moon.id,
                    });
                }
            }
            if planet.position.distance(p) <= planet.radius * scale {
                return Some(Hit::Planet(planet.id));
            }
        }
        if p.length() <= self.sun.radius * self.sun.scale() {
            return Some(Hit::Sun);
        }
        None
    }

    /// Move hover to `hit`, firing leave / enter on the bodies involved.
    pub fn set_hover(&mut self, hit: Option<Hit>) {
        if hit == self.hovered {
            return;
        }
        if let Some(old) = self.hovered.take() {
            self.hover_body(old, false);
        }
        if let Some(new) = hit {
            self.hover_body(new, true);
        }
        self.hovered = hit;
    }

    fn hover_body(&mut self, hit: Hit, entering: bool) {
        match hit {
            Hit::Sun if entering => self.sun.hover_enter(),
            Hit::Sun => self.sun.hover_leave(),
            Hit::Planet(id) => {
                if let Some(planet) = self.planet_mut(id) {
                    if entering {
                        planet.hover_enter();
                    } else {
                        planet.hover_leave();
                    }
                }
            }
            Hit::Moon { planet, moon } => {
                if let Some(m) = self.planet_mut(planet).and_then(|p| p.moon_mut(moon)) {
                    m.set_hovered(entering);
                }
            }
        }
    }

    // -- Simulation --

    pub fn advance(&mut self, running: bool) {
        self.sun.advance(running);
        for planet in &mut self.planets {
            planet.advance(running);
        }
    }

    /// Rectangle covering the sun and every planet system.
    pub fn bounds(&self) -> Rect {
        let sun = Rect::square(Vec2::ZERO, self.sun.extent() * self.sun.scale());
        self.planets.iter().fold(sun, |acc, p| {
            acc.union(&Rect::square(p.position, p.system_radius() * p.scale()))
        })
    }

    /// Where the camera should be heading.
    pub fn focus_rect(&self, config: &MapConfig) -> Rect {
        if let Some(planet) = self.pinned_planet() {
            let reach = planet.system_radius() * (1.0 + config.planet_focus_margin);
            return Rect::square(planet.position, reach.max(config.min_focus_half_extent));
        }
        if self.pinned == Some(PinTarget::Sun) {
            return Rect::square(Vec2::ZERO, self.sun.extent() + config.sun_focus_margin);
        }
        self.bounds().expanded(config.overview_margin)
    }

    /// Planets in paint order (ascending draw priority).
    pub fn draw_order(&self) -> Vec<&Planet> {
        let mut order: Vec<&Planet> = self.planets.iter().collect();
        order.sort_by(|a, b| a.z().total_cmp(&b.z()));
        order
    }

    /// Labels for every body, in paint order.
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = vec![Label {
            text: self.sun.title.clone(),
            anchor: Vec2::new(0.0, -self.sun.radius * 0.1),
            size: self.sun.radius * 0.15 * if self.sun.is_pinned() { 1.2 } else { 1.0 },
            struck: false,
            emphasized: true,
            opacity: self.sun.opacity(),
        }];

        for planet in self.draw_order() {
            let status = planet.status();
            let size = (planet.radius * 0.1).max(14.0);
            labels.push(Label {
                text: planet.text(),
                anchor: planet.position + Vec2::new(0.0, (planet.radius + size * 2.0) * planet.scale()),
                size,
                struck: status.cancelled,
                emphasized: !status.cancelled && (status.done || planet.is_highlighted()),
                opacity: planet.opacity(),
            });
            for moon in planet.moons.iter().filter(|m| m.title_visible()) {
                let size = (moon.radius * 0.8).max(8.0);
                labels.push(Label {
                    text: moon.text(),
                    anchor: planet.position + (moon.position + Vec2::new(0.0, moon.radius + 3.0)) * planet.scale(),
                    size,
                    struck: moon.status().cancelled,
                    emphasized: true,
                    opacity: planet.opacity(),
                });
            }
        }
        labels
    }
}
