use glam::Vec2;

use crate::extensions::easing::lerp;

/// Axis-aligned rectangle in scene units (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self::new(center.x - half.x, center.y - half.y, half.x * 2.0, half.y * 2.0)
    }

    /// Square of half-side `half` around `center`.
    pub fn square(center: Vec2, half: f32) -> Self {
        Self::from_center(center, Vec2::splat(half))
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Rect::new(left, top, self.right().max(other.right()) - left, self.bottom().max(other.bottom()) - top)
    }

    /// Grow by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(self.left - margin, self.top - margin, self.width + 2.0 * margin, self.height + 2.0 * margin)
    }

    /// Move each of left/top/width/height a fraction `t` toward `target`.
    pub fn lerp(&self, target: &Rect, t: f32) -> Rect {
        Rect::new(
            lerp(self.left, target.left, t),
            lerp(self.top, target.top, t),
            lerp(self.width, target.width, t),
            lerp(self.height, target.height, t),
        )
    }

    /// Smallest rectangle with the given aspect (width / height) that
    /// contains this one, sharing its center.
    pub fn fit_aspect(&self, aspect: f32) -> Rect {
        if !(aspect.is_finite() && aspect > 0.0) || self.height <= 0.0 {
            return *self;
        }
        let (w, h) = if self.width / self.height > aspect {
            (self.width, self.width / aspect)
        } else {
            (self.height * aspect, self.height)
        };
        Rect::from_center(self.center(), Vec2::new(w / 2.0, h / 2.0))
    }
}

/// Smoothly animated viewport.
///
/// The framing rectangle eases toward a target each step; the visible area
/// is that rectangle widened to the screen's aspect ratio.
#[derive(Debug, Clone)]
pub struct Camera {
    frame: Rect,
    screen: Vec2,
    ease: f32,
    placed: bool,
}

impl Camera {
    pub fn new(screen_width: f32, screen_height: f32, ease: f32) -> Self {
        Self {
            frame: Rect::square(Vec2::ZERO, 1000.0),
            screen: Vec2::new(screen_width.max(1.0), screen_height.max(1.0)),
            ease: ease.clamp(0.0, 1.0),
            placed: false,
        }
    }

    /// Host surface resized (pixels).
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen = Vec2::new(screen_width.max(1.0), screen_height.max(1.0));
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    /// Jump straight to `target` (first frame after a build).
    pub fn snap_to(&mut self, target: Rect) {
        self.frame = target;
        self.placed = true;
    }

    /// Ease one step toward `target`. The first call snaps.
    pub fn follow(&mut self, target: Rect) {
        if self.placed {
            self.frame = self.frame.lerp(&target, self.ease);
        } else {
            self.snap_to(target);
        }
    }

    /// Forget the current placement so the next `follow` snaps.
    pub fn unplace(&mut self) {
        self.placed = false;
    }

    /// The eased framing rectangle, before aspect fitting.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The visible scene rectangle.
    pub fn viewport(&self) -> Rect {
        self.frame.fit_aspect(self.screen.x / self.screen.y)
    }

    /// Scene units per screen pixel.
    pub fn units_per_pixel(&self) -> f32 {
        self.viewport().width / self.screen.x
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        let vp = self.viewport();
        Vec2::new(vp.left, vp.top) + p * self.units_per_pixel()
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        let vp = self.viewport();
        (p - Vec2::new(vp.left, vp.top)) / self.units_per_pixel()
    }
}
