pub mod layout;
pub mod shapes;
pub mod starfield;
pub mod sync;
pub mod zodiac;
#[cfg(feature = "vectors")]
pub mod render;
#[cfg(feature = "vectors")]
pub mod vector;
