//! Loose fragments scattered around a broken or troubled body.

use glam::Vec2;

use crate::api::types::Color;

use super::clip::{sort_around_centroid, Polygon};
use super::rng::Rng;
use super::MIN_SHAPE_RADIUS;

/// Innermost / outermost / most likely distance, in body radii.
const BAND_NEAR: f32 = 1.1;
const BAND_FAR: f32 = 3.0;
const BAND_PEAK: f32 = 1.4;

#[derive(Debug, Clone, PartialEq)]
pub struct Debris {
    pub polygon: Polygon,
    pub color: Color,
}

/// Scatter `count` small gray polygons around a body of `radius`.
///
/// Distances follow a triangular distribution peaking just outside the
/// surface, and fragments shrink with distance, so the field is densest and
/// chunkiest next to the body.
pub fn generate_debris_field(radius: f32, count: usize, rng: &mut Rng) -> Vec<Debris> {
    let r = radius.max(MIN_SHAPE_RADIUS);
    let max_size = (r * 0.15).max(1.0);
    let min_size = max_size * 0.25;

    (0..count)
        .map(|_| {
            let band = rng.triangular(BAND_NEAR, BAND_FAR, BAND_PEAK);
            let closeness = 1.0 - (band - BAND_NEAR) / (BAND_FAR - BAND_NEAR);
            let size = (min_size + (max_size - min_size) * closeness) * rng.range(0.7, 1.3);
            let at = Vec2::from_angle(rng.angle()) * band * r;
            let spin = Vec2::from_angle(rng.angle());

            let mut polygon: Polygon = (0..rng.range_int(3, 5))
                .map(|_| Vec2::new(rng.range(-size, size), rng.range(-size, size)))
                .collect();
            sort_around_centroid(&mut polygon);
            for p in polygon.iter_mut() {
                *p = at + spin.rotate(*p);
            }

            let gray = rng.range_int(50, 120) as u8;
            let alpha = rng.range_int(100, 255) as u8;
            Debris {
                polygon,
                color: Color::rgba8(gray, gray, gray, alpha),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_sit_outside_the_body() {
        let mut rng = Rng::new(12);
        let field = generate_debris_field(40.0, 200, &mut rng);
        assert_eq!(field.len(), 200);
        for d in &field {
            let c = d.polygon.iter().copied().sum::<Vec2>() / d.polygon.len() as f32;
            assert!(c.length() > 40.0 * 0.9, "fragment inside the body: {}", c.length());
            assert!(c.length() < 40.0 * 3.3);
        }
    }

    #[test]
    fn near_fragments_are_larger_on_average() {
        let mut rng = Rng::new(99);
        let field = generate_debris_field(50.0, 2000, &mut rng);
        let extent = |d: &Debris| {
            let c = d.polygon.iter().copied().sum::<Vec2>() / d.polygon.len() as f32;
            let spread = d.polygon.iter().map(|p| p.distance(c)).fold(0.0, f32::max);
            (c.length(), spread)
        };
        let (near, far): (Vec<_>, Vec<_>) =
            field.iter().map(extent).partition(|(dist, _)| *dist < 50.0 * 1.8);
        let mean = |v: &[(f32, f32)]| v.iter().map(|(_, s)| s).sum::<f32>() / v.len() as f32;
        assert!(mean(&near) > mean(&far));
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = Rng::new(1);
        assert!(generate_debris_field(10.0, 0, &mut rng).is_empty());
    }
}
