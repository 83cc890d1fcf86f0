//! Decorative background: drifting stars, nebulae and short-lived
//! constellation links. Purely cosmetic and independent of the task data.

use glam::Vec2;

use crate::api::config::MapConfig;
use crate::api::types::Color;
use crate::extensions::easing::pulse;
use crate::systems::shapes::Rng;

/// Steps a star flash lasts.
pub const FLASH_STEPS: u32 = 200;
/// Chance per star per step of starting a flash.
const FLASH_CHANCE: f32 = 0.001;
const GIANT_CHANCE: f32 = 0.01;
const LINK_CHANCE: f32 = 0.1;
const LINK_MIN: f32 = 50.0;
const LINK_MAX: f32 = 300.0;
/// Peak constellation line alpha (0-255).
const LINK_ALPHA: f32 = 150.0;
/// Degrees per step the four-point stars turn.
const CROSS_SPIN: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarKind {
    Dot,
    Cross,
    Giant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Vec2,
    velocity: Vec2,
    pub size: f32,
    pub kind: StarKind,
    pub alpha: u8,
    flash: u32,
}

impl Star {
    pub fn is_flashing(&self) -> bool {
        self.flash > 0
    }

    /// Radius including the current flash swell.
    pub fn drawn_size(&self) -> f32 {
        if self.flash == 0 {
            return self.size;
        }
        self.size + pulse(self.flash as f32 / FLASH_STEPS as f32) * 3.0
    }
}

/// A faint rotated elliptical glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nebula {
    pub center: Vec2,
    pub size: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub color: Color,
}

/// A line between two stars that fades in and out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationLink {
    pub a: usize,
    pub b: usize,
    life: u32,
    max_life: u32,
}

impl ConstellationLink {
    /// Current line alpha in 0-255.
    pub fn alpha(&self) -> u8 {
        let t = self.life as f32 / self.max_life.max(1) as f32;
        (LINK_ALPHA * pulse(t)) as u8
    }
}

pub struct Starfield {
    pub stars: Vec<Star>,
    pub nebulae: Vec<Nebula>,
    pub links: Vec<ConstellationLink>,
    time: u32,
    rng: Rng,
    star_count: usize,
    nebula_count: usize,
    padding: f32,
    link_interval: u32,
    link_sample: usize,
    link_life: u32,
}

impl Starfield {
    pub fn new(rng: Rng, config: &MapConfig) -> Self {
        Self {
            stars: Vec::with_capacity(config.star_count),
            nebulae: Vec::with_capacity(config.nebula_count),
            links: Vec::new(),
            time: 0,
            rng,
            star_count: config.star_count,
            nebula_count: config.nebula_count,
            padding: config.starfield_padding,
            link_interval: config.constellation_interval.max(1),
            link_sample: config.constellation_sample,
            link_life: config.constellation_life,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn clear(&mut self) {
        self.stars.clear();
        self.nebulae.clear();
        self.links.clear();
    }

    /// Fill the square of `half_extent` around `center`, padded. Does nothing
    /// if the field is already populated; `clear` it first to regenerate.
    pub fn populate(&mut self, center: Vec2, half_extent: f32) {
        if !self.is_empty() {
            return;
        }
        let half = Vec2::splat(half_extent.max(0.0) + self.padding);
        let tints = [
            Color::rgba8(0x33, 0x00, 0x44, 40),
            Color::rgba8(0x00, 0x22, 0x44, 40),
            Color::rgba8(0x00, 0x44, 0x44, 40),
        ];
        let rng = &mut self.rng;

        for _ in 0..self.nebula_count {
            self.nebulae.push(Nebula {
                center: center + Vec2::new(rng.range(-half.x, half.x), rng.range(-half.y, half.y)),
                size: Vec2::new(rng.range(500.0, 1200.0), rng.range(300.0, 800.0)),
                rotation: rng.range(0.0, 360.0),
                color: rng.pick(&tints).copied().unwrap_or(tints[0]),
            });
        }

        for _ in 0..self.star_count {
            let position = center + Vec2::new(rng.range(-half.x, half.x), rng.range(-half.y, half.y));
            let velocity = Vec2::new(rng.range(-0.05, 0.05), rng.range(-0.05, 0.05));
            let mut kind = if rng.next_int(4) == 0 { StarKind::Cross } else { StarKind::Dot };
            let size = if rng.chance(GIANT_CHANCE) {
                kind = StarKind::Giant;
                rng.range(5.0, 9.0)
            } else {
                rng.range(1.0, 3.5)
            };
            self.stars.push(Star {
                position,
                velocity,
                size,
                kind,
                alpha: rng.range_int(100, 255) as u8,
                flash: rng.range_int(0, 500),
            });
        }
    }

    /// Steps simulated so far.
    pub fn time(&self) -> u32 {
        self.time
    }

    /// Current rotation of four-point stars, in degrees.
    pub fn cross_rotation(&self) -> f32 {
        self.time as f32 * CROSS_SPIN
    }

    pub fn advance(&mut self) {
        self.time = self.time.wrapping_add(1);
        for star in &mut self.stars {
            star.position += star.velocity;
            if self.rng.chance(FLASH_CHANCE) {
                star.flash = FLASH_STEPS;
            }
            star.flash = star.flash.saturating_sub(1);
        }

        if self.time % self.link_interval == 0 {
            self.spawn_links();
        }

        for link in &mut self.links {
            link.life = link.life.saturating_sub(1);
        }
        self.links.retain(|l| l.life > 0);
    }

    /// Link pairs among a random sample of stars that sit at a pleasing distance.
    fn spawn_links(&mut self) {
        let n = self.stars.len();
        let k = self.link_sample.min(n);
        let mut sample: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.rng.next_int((n - i) as u32) as usize;
            sample.swap(i, j);
        }
        sample.truncate(k);

        for (i, &a) in sample.iter().enumerate() {
            for &b in &sample[i + 1..] {
                let d = self.stars[a].position.distance(self.stars[b].position);
                if d > LINK_MIN && d < LINK_MAX && self.rng.chance(LINK_CHANCE) {
                    self.links.push(ConstellationLink {
                        a,
                        b,
                        life: self.link_life,
                        max_life: self.link_life,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Starfield {
        let mut sf = Starfield::new(Rng::new(7), &MapConfig::default());
        sf.populate(Vec2::ZERO, 2000.0);
        sf
    }

    #[test]
    fn populate_once() {
        let mut sf = field();
        assert_eq!(sf.stars.len(), 1200);
        assert_eq!(sf.nebulae.len(), 5);
        let first = sf.stars[0].clone();
        sf.populate(Vec2::new(9000.0, 0.0), 10.0);
        assert_eq!(sf.stars.len(), 1200);
        assert_eq!(sf.stars[0], first);

        sf.clear();
        sf.populate(Vec2::new(9000.0, 0.0), 10.0);
        assert_eq!(sf.stars.len(), 1200);
        assert_ne!(sf.stars[0], first);
    }

    #[test]
    fn star_mix() {
        let sf = field();
        let crosses = sf.stars.iter().filter(|s| s.kind == StarKind::Cross).count();
        let giants = sf.stars.iter().filter(|s| s.kind == StarKind::Giant).count();
        assert!(crosses > 150 && crosses < 450, "crosses: {crosses}");
        assert!(giants < 40);
        for s in &sf.stars {
            match s.kind {
                StarKind::Giant => assert!(s.size >= 5.0 && s.size < 9.0),
                _ => assert!(s.size >= 1.0 && s.size < 3.5),
            }
        }
    }

    #[test]
    fn stars_drift() {
        let mut sf = field();
        let before: Vec<Vec2> = sf.stars.iter().map(|s| s.position).collect();
        for _ in 0..10 {
            sf.advance();
        }
        let moved = sf.stars.iter().zip(&before).filter(|(s, b)| s.position != **b).count();
        assert!(moved > 1000);
        assert!(sf.stars.iter().zip(&before).all(|(s, b)| s.position.distance(*b) < 1.0));
    }

    #[test]
    fn constellations_spawn_and_expire() {
        let cfg = MapConfig {
            star_count: 400,
            starfield_padding: 0.0,
            constellation_interval: 5,
            constellation_life: 20,
            ..MapConfig::default()
        };
        let mut sf = Starfield::new(Rng::new(3), &cfg);
        sf.populate(Vec2::ZERO, 100.0);
        for _ in 0..5 {
            sf.advance();
        }
        assert!(!sf.links.is_empty());
        for link in &sf.links {
            let d = sf.stars[link.a].position.distance(sf.stars[link.b].position);
            assert!(d > 40.0 && d < 310.0);
            assert!(link.alpha() <= 150);
        }

        // No further spawns once the interval is pushed out of reach.
        sf.link_interval = u32::MAX;
        for _ in 0..25 {
            sf.advance();
        }
        assert!(sf.links.is_empty());
    }

    #[test]
    fn link_alpha_peaks_midlife() {
        let mid = ConstellationLink { a: 0, b: 1, life: 200, max_life: 400 };
        let end = ConstellationLink { a: 0, b: 1, life: 1, max_life: 400 };
        assert_eq!(mid.alpha(), 150);
        assert!(end.alpha() < 5);
    }
}
