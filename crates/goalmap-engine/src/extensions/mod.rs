// extensions/mod.rs
//
// Small helpers decoupled from the body graph.

pub mod easing;

pub use easing::{approach, lerp, pulse};
