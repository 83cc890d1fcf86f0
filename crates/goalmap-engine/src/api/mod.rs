pub mod config;
pub mod map;
pub mod types;

pub use config::MapConfig;
pub use map::{GoalMap, MenuEntry, Reconcile};
pub use types::{BodyId, Color, IdAllocator};
