//! Moon craters: a rim ellipse with a slightly offset pit inside it.

use glam::Vec2;

use super::rng::Rng;
use super::MIN_SHAPE_RADIUS;

/// Axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Vec2,
    pub radii: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crater {
    /// Outer rim.
    pub rim: Ellipse,
    /// Inner pit, pushed away from the body center.
    pub pit: Ellipse,
}

/// Random crater somewhere on a body of `body_radius` centered at the origin.
pub fn generate_crater(body_radius: f32, rng: &mut Rng) -> Crater {
    let r = body_radius.max(MIN_SHAPE_RADIUS);
    let center = Vec2::new(rng.range(-0.6 * r, 0.6 * r), rng.range(-0.6 * r, 0.6 * r));
    let rim_radius = rng.range(0.15 * r, 0.3 * r);
    let pit_radius = rim_radius * rng.range(0.6, 0.8);
    let squash = Vec2::new(rng.range(0.9, 1.1), rng.range(0.9, 1.1));

    let pit_shift = center.length() / r * pit_radius * 0.2;
    let pit_center = center + center.normalize_or_zero() * pit_shift;

    Crater {
        rim: Ellipse {
            center,
            radii: squash * rim_radius,
        },
        pit: Ellipse {
            center: pit_center,
            radii: squash * pit_radius,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pit_is_smaller_than_rim() {
        let mut rng = Rng::new(5);
        for _ in 0..50 {
            let c = generate_crater(40.0, &mut rng);
            assert!(c.pit.radii.x < c.rim.radii.x);
            assert!(c.pit.radii.y < c.rim.radii.y);
            assert!(c.rim.center.length() <= 40.0 * 0.6 * std::f32::consts::SQRT_2 + 1e-3);
        }
    }

    #[test]
    fn pit_shifts_outward() {
        let mut rng = Rng::new(9);
        let c = generate_crater(40.0, &mut rng);
        assert!(c.pit.center.length() >= c.rim.center.length());
    }

    #[test]
    fn zero_radius_body_gets_visible_crater() {
        let mut rng = Rng::new(1);
        let c = generate_crater(0.0, &mut rng);
        assert!(c.rim.radii.x > 0.0 && c.pit.radii.y > 0.0);
    }
}
