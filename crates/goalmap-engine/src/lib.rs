pub mod api;
pub mod core;
pub mod components;
pub mod data;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::MapConfig;
pub use api::map::{GoalMap, MenuEntry, Reconcile};
pub use api::types::{BodyId, Color, IdAllocator};
pub use components::{InteractionState, Moon, Planet, Status, StatusOutcome, StatusUpdate, Sun};
pub use core::scene::{Hit, Label, PinTarget, Scene};
pub use core::time::FixedTimestep;
pub use data::{compute_progress, Note, SharedTask, TaskNode};
pub use renderer::camera::{Camera, Rect};
pub use input::queue::{InputEvent, InputQueue, MenuAction, MenuTarget};
pub use bridge::protocol::{HEADER_FLOATS, VERTEX_FLOATS};
pub use systems::shapes::Rng;
pub use systems::starfield::Starfield;
pub use systems::sync::PatchReport;
pub use systems::zodiac::ZodiacSign;

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorCanvas, VectorVertex};
#[cfg(feature = "vectors")]
pub use systems::render::{paint_map, PaintParams};

// Extensions: decoupled optional helpers
pub use extensions::{approach, lerp, pulse};
