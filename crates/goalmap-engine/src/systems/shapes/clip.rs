//! Small polygon toolkit: circle outlines, half-plane and convex clipping.
//!
//! Polygons are closed implicitly (last point connects to the first) and
//! generated counter-clockwise.

use std::f32::consts::TAU;

use glam::Vec2;

/// A closed polygon outline.
pub type Polygon = Vec<Vec2>;

/// Areas below this are treated as empty.
pub const AREA_EPSILON: f32 = 1e-3;

/// Regular polygon approximating a circle. At least 3 vertices.
pub fn circle_polygon(center: Vec2, radius: f32, segments: usize) -> Polygon {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = TAU * i as f32 / segments as f32;
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Shoelace area, positive for counter-clockwise outlines.
pub fn signed_area(poly: &[Vec2]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

pub fn area(poly: &[Vec2]) -> f32 {
    signed_area(poly).abs()
}

/// Vertex average; good enough for nudging small shards.
pub fn centroid(poly: &[Vec2]) -> Vec2 {
    if poly.is_empty() {
        return Vec2::ZERO;
    }
    poly.iter().copied().sum::<Vec2>() / poly.len() as f32
}

pub fn translate(poly: &mut [Vec2], offset: Vec2) {
    for p in poly.iter_mut() {
        *p += offset;
    }
}

/// Order points by angle around their centroid, producing a simple
/// counter-clockwise outline from a loose point cloud.
pub fn sort_around_centroid(points: &mut [Vec2]) {
    let c = centroid(points);
    points.sort_by(|a, b| {
        let ta = (*a - c).to_angle();
        let tb = (*b - c).to_angle();
        ta.total_cmp(&tb)
    });
}

/// Keep the part of `poly` where `normal · p >= offset` (Sutherland–Hodgman
/// against a single plane).
pub fn clip_half_plane(poly: &[Vec2], normal: Vec2, offset: f32) -> Polygon {
    let mut out = Vec::with_capacity(poly.len() + 2);
    if poly.is_empty() {
        return out;
    }
    for (i, &cur) in poly.iter().enumerate() {
        let next = poly[(i + 1) % poly.len()];
        let dc = normal.dot(cur) - offset;
        let dn = normal.dot(next) - offset;
        if dc >= 0.0 {
            out.push(cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            let t = dc / (dc - dn);
            out.push(cur + (next - cur) * t);
        }
    }
    out
}

/// Intersect `subject` with a convex counter-clockwise `clip` polygon.
pub fn clip_convex(subject: &[Vec2], clip: &[Vec2]) -> Polygon {
    let mut out: Polygon = subject.to_vec();
    for (i, &a) in clip.iter().enumerate() {
        if out.is_empty() {
            break;
        }
        let b = clip[(i + 1) % clip.len()];
        let edge = b - a;
        let inward = Vec2::new(-edge.y, edge.x);
        out = clip_half_plane(&out, inward, inward.dot(a));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn circle_area_close_to_pi_r2() {
        let c = circle_polygon(Vec2::ZERO, 10.0, 128);
        let expected = std::f32::consts::PI * 100.0;
        assert!((area(&c) - expected).abs() / expected < 0.01);
        assert!(signed_area(&c) > 0.0);
    }

    #[test]
    fn half_plane_cuts_square_in_half() {
        let half = clip_half_plane(&square(), Vec2::X, 0.0);
        assert!((area(&half) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn half_plane_outside_is_empty() {
        let none = clip_half_plane(&square(), Vec2::X, 5.0);
        assert!(area(&none) < AREA_EPSILON);
    }

    #[test]
    fn convex_clip_of_overlapping_squares() {
        let mut other = square();
        translate(&mut other, Vec2::new(1.0, 1.0));
        let overlap = clip_convex(&square(), &other);
        assert!((area(&overlap) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sorting_makes_a_simple_outline() {
        let mut pts = vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
        ];
        sort_around_centroid(&mut pts);
        assert!((area(&pts) - 4.0).abs() < 1e-5);
    }
}
