// extensions/easing.rs
//
// Pure interpolation helpers shared by bodies, camera and starfield.
// No dependencies on the scene, just math.

use std::f32::consts::PI;

/// Differences below this are treated as settled by [`approach`].
pub const SETTLE_EPSILON: f32 = 1e-4;

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One step of exponential smoothing: move `current` a fixed fraction of the
/// remaining distance toward `target`. Snaps once the gap is negligible so
/// repeated calls settle exactly.
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    let gap = target - current;
    if gap.abs() <= SETTLE_EPSILON {
        target
    } else {
        current + gap * factor
    }
}

/// Half-sine bump: 0 at `t = 0` and `t = 1`, 1 at `t = 0.5`.
/// Input is clamped to [0, 1].
#[inline]
pub fn pulse(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin()
}
