pub mod task;
pub mod progress;
pub mod title;

pub use task::{Note, SharedTask, TaskNode};
pub use progress::{compute_progress, task_completion};
pub use title::clean_title;
