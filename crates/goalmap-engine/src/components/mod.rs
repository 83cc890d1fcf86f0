pub mod status;
pub mod orbit;
pub mod moon;
pub mod planet;
pub mod sun;

pub use status::{InteractionState, Status, StatusOutcome, StatusUpdate};
pub use orbit::{Orbit, ScaleEase};
pub use moon::{Moon, MoonDesc, MoonSurface};
pub use planet::{OrbitDecoration, Planet, PlanetDesc, PlanetSurface};
pub use sun::Sun;
