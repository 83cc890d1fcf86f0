use crate::api::types::BodyId;
use crate::components::orbit::ScaleEase;

pub const SUN_HOVER_SCALE: f32 = 1.05;
pub const SUN_PINNED_SCALE: f32 = 1.2;
/// Aura extends this fraction of the radius beyond the disc.
pub const AURA_FACTOR: f32 = 0.3;
/// Extra room around the aura for the glow.
pub const GLOW_PADDING: f32 = 200.0;

/// The note itself: a stationary body at the origin showing overall progress.
#[derive(Debug, Clone)]
pub struct Sun {
    pub id: BodyId,
    pub title: String,
    pub radius: f32,
    progress: f32,
    pinned: bool,
    hovered: bool,
    scale: ScaleEase,
    opacity: f32,
}

impl Sun {
    pub fn new(id: BodyId, title: impl Into<String>, radius: f32) -> Self {
        Self {
            id,
            title: title.into(),
            radius,
            progress: 0.0,
            pinned: false,
            hovered: false,
            scale: ScaleEase::new(),
            opacity: 1.0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Store a progress ratio, clamped to [0, 1]. NaN reads as 0.
    pub fn set_progress(&mut self, ratio: f32) {
        self.progress = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    }

    pub fn update_size(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        self.retarget();
    }

    pub fn hover_enter(&mut self) {
        self.hovered = true;
        self.retarget();
    }

    pub fn hover_leave(&mut self) {
        self.hovered = false;
        self.retarget();
    }

    fn retarget(&mut self) {
        self.scale.target = if self.pinned {
            SUN_PINNED_SCALE
        } else if self.hovered {
            SUN_HOVER_SCALE
        } else {
            1.0
        };
    }

    pub fn scale(&self) -> f32 {
        self.scale.current
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn advance(&mut self, running: bool) {
        if running {
            self.scale.step();
        }
    }

    /// Half extent of the area the sun paints into (disc, aura and glow).
    pub fn extent(&self) -> f32 {
        self.radius * (1.0 + AURA_FACTOR) + GLOW_PADDING
    }

    /// Whole progress percentage shown under the title.
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.progress * 100.0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let mut sun = Sun::new(BodyId(1), "Trip", 400.0);
        sun.set_progress(1.7);
        assert_eq!(sun.progress(), 1.0);
        sun.set_progress(-0.2);
        assert_eq!(sun.progress(), 0.0);
        sun.set_progress(f32::NAN);
        assert_eq!(sun.progress(), 0.0);
        sun.set_progress(0.756);
        assert_eq!(sun.percent_label(), "75%");
    }

    #[test]
    fn pin_scale_wins_over_hover() {
        let mut sun = Sun::new(BodyId(1), "Trip", 400.0);
        sun.hover_enter();
        sun.set_pinned(true);
        for _ in 0..500 {
            sun.advance(true);
        }
        assert!((sun.scale() - SUN_PINNED_SCALE).abs() < 1e-3);

        sun.set_pinned(false);
        for _ in 0..500 {
            sun.advance(true);
        }
        assert!((sun.scale() - SUN_HOVER_SCALE).abs() < 1e-3);
    }

    #[test]
    fn resize_changes_extent() {
        let mut sun = Sun::new(BodyId(1), "Trip", 400.0);
        let small = sun.extent();
        sun.update_size(600.0);
        assert!(sun.extent() > small);
    }
}
