//! Broken-body geometry for cancelled planets and moons.
//!
//! A few thick chords are cut across the body disc. The disc minus the cut
//! strips is the remainder (a set of convex fragments); small random shards
//! are carved from inside the strips and drift outward from the center.

use glam::Vec2;

use super::clip::{
    area, centroid, circle_polygon, clip_convex, clip_half_plane, sort_around_centroid,
    translate, Polygon,
};
use super::rng::Rng;
use super::MIN_SHAPE_RADIUS;

/// Outline resolution of the body disc.
const DISC_SEGMENTS: usize = 48;

/// One chord-shaped cut: the strip `|normal · p - offset| <= half_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    pub normal: Vec2,
    pub offset: f32,
    pub half_width: f32,
}

impl Cut {
    /// Unit direction along the chord.
    pub fn direction(&self) -> Vec2 {
        self.normal.perp()
    }

    /// Point of the cut's center line nearest to the body center.
    pub fn foot(&self) -> Vec2 {
        self.normal * self.offset
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shatter {
    /// What is left of the body, as convex fragments.
    pub remainder: Vec<Polygon>,
    /// Loose shards, already nudged outward.
    pub shards: Vec<Polygon>,
    pub cuts: Vec<Cut>,
}

/// Shatter a disc of `radius` centered at the origin with 2–3 random cuts.
///
/// Always yields at least one remainder fragment and one shard.
pub fn generate_shatter(radius: f32, rng: &mut Rng) -> Shatter {
    let r = radius.max(MIN_SHAPE_RADIUS);
    let disc = circle_polygon(Vec2::ZERO, r, DISC_SEGMENTS);
    let min_area = r * r * 1e-4;

    let cuts: Vec<Cut> = (0..rng.range_int(2, 3))
        .map(|_| {
            let normal = Vec2::from_angle(rng.angle());
            let through = Vec2::new(rng.range(-0.25, 0.25), rng.range(-0.25, 0.25)) * r;
            let half_width = (rng.range(0.05, 0.15) * r).clamp(0.25_f32.min(0.2 * r), 0.2 * r);
            Cut {
                normal,
                offset: normal.dot(through),
                half_width,
            }
        })
        .collect();

    let mut remainder = vec![disc.clone()];
    for cut in &cuts {
        remainder = remainder
            .iter()
            .flat_map(|piece| {
                let above = clip_half_plane(piece, cut.normal, cut.offset + cut.half_width);
                let below = clip_half_plane(piece, -cut.normal, -(cut.offset - cut.half_width));
                [above, below]
            })
            .filter(|piece| area(piece) > min_area)
            .collect();
    }
    if remainder.is_empty() {
        remainder.push(circle_polygon(Vec2::ZERO, r * 0.6, DISC_SEGMENTS));
    }

    let mut shards = Vec::new();
    let shard_size = (r * 0.12).max(0.8);
    for _ in 0..rng.range_int(3, 7) {
        let Some(cut) = rng.pick(&cuts).copied() else {
            break;
        };
        let anchor = cut.foot() + cut.direction() * rng.range(-0.9 * r, 0.9 * r);
        let mut shard: Polygon = (0..rng.range_int(3, 5))
            .map(|_| {
                anchor
                    + Vec2::new(
                        rng.range(-shard_size, shard_size),
                        rng.range(-shard_size, shard_size),
                    )
            })
            .collect();
        sort_around_centroid(&mut shard);

        let shard = clip_half_plane(&shard, cut.normal, cut.offset - cut.half_width);
        let shard = clip_half_plane(&shard, -cut.normal, -(cut.offset + cut.half_width));
        let mut shard = clip_convex(&shard, &disc);
        if area(&shard) <= min_area {
            continue;
        }
        let nudge = drift(centroid(&shard), r, rng);
        translate(&mut shard, nudge);
        shards.push(shard);
    }
    if shards.is_empty() {
        let foot = cuts.first().map(Cut::foot).unwrap_or(Vec2::ZERO);
        let mut speck = vec![
            foot + Vec2::new(0.0, -shard_size),
            foot + Vec2::new(shard_size, shard_size),
            foot + Vec2::new(-shard_size, shard_size),
        ];
        translate(&mut speck, drift(foot, r, rng));
        shards.push(speck);
    }

    Shatter {
        remainder,
        shards,
        cuts,
    }
}

/// Outward displacement for a shard sitting at `at`.
fn drift(at: Vec2, r: f32, rng: &mut Rng) -> Vec2 {
    let dir = if at.length_squared() > 1e-6 {
        at.normalize()
    } else {
        Vec2::from_angle(rng.angle())
    };
    dir * rng.range(0.03, 0.17) * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_is_smaller_than_disc() {
        let mut rng = Rng::new(21);
        let s = generate_shatter(60.0, &mut rng);
        let disc = std::f32::consts::PI * 60.0 * 60.0;
        let left: f32 = s.remainder.iter().map(|p| area(p)).sum();
        assert!(left < disc);
        assert!(left > disc * 0.3, "too much was cut away: {left}");
        assert!((2..=3).contains(&s.cuts.len()));
    }

    #[test]
    fn cuts_split_body_into_fragments() {
        let mut rng = Rng::new(4);
        let s = generate_shatter(80.0, &mut rng);
        assert!(s.remainder.len() >= 2);
    }

    #[test]
    fn shards_move_outward() {
        let mut rng = Rng::new(77);
        let s = generate_shatter(50.0, &mut rng);
        assert!(!s.shards.is_empty());
        for shard in &s.shards {
            assert!(area(shard) > 0.0);
        }
    }

    #[test]
    fn tiny_and_zero_radius_do_not_degenerate() {
        for radius in [0.0, 0.5, 6.0] {
            let mut rng = Rng::new(8);
            let s = generate_shatter(radius, &mut rng);
            assert!(!s.remainder.is_empty());
            assert!(s.remainder.iter().all(|p| p.len() >= 3));
            assert!(!s.shards.is_empty());
        }
    }
}
