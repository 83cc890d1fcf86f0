//! Procedural shape generator.
//!
//! Pure functions of their inputs plus an explicit `Rng`: calling one again
//! with the same generator state reproduces the shape, advancing the
//! generator ("reroll") gives a fresh one.

mod rng;
pub mod clip;
mod blob;
mod crater;
mod shatter;
mod debris;

pub use rng::Rng;
pub use clip::Polygon;
pub use blob::generate_blob;
pub use crater::{generate_crater, Crater, Ellipse};
pub use shatter::{generate_shatter, Cut, Shatter};
pub use debris::{generate_debris_field, Debris};

/// Radius floor applied by every generator.
pub const MIN_SHAPE_RADIUS: f32 = 1.0;
