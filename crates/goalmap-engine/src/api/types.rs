use serde::{Deserialize, Serialize};

/// Unique identifier for a body (Sun, Planet or Moon) in the map.
///
/// Identifiers are never reused within one `IdAllocator`, so a rebuilt map
/// always hands out fresh ids while a patched map keeps the old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Monotonic body id source.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generate the next unique body ID.
    pub fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully opaque color from 8-bit RGB values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba8(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiply the current alpha (used for focus fading).
    pub fn faded(self, opacity: f32) -> Self {
        Self { a: self.a * opacity.clamp(0.0, 1.0), ..self }
    }

    /// Brighten by `percent` (130 = 30% brighter), channels saturate at 1.0.
    pub fn lighter(self, percent: u32) -> Self {
        let f = percent as f32 / 100.0;
        Self {
            r: (self.r * f).min(1.0),
            g: (self.g * f).min(1.0),
            b: (self.b * f).min(1.0),
            a: self.a,
        }
    }

    /// Darken by `percent` (150 = divide brightness by 1.5).
    pub fn darker(self, percent: u32) -> Self {
        let f = (percent as f32 / 100.0).max(0.01);
        Self {
            r: self.r / f,
            g: self.g / f,
            b: self.b / f,
            a: self.a,
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn hex_parsing() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.5).abs() < 0.01);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);

        let c = Color::from_hex("00000080").unwrap();
        assert!((c.a - 0.5).abs() < 0.01);

        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn lighter_saturates() {
        let c = Color::rgb(0.9, 0.5, 0.1).lighter(130);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.65).abs() < 1e-6);
    }
}
