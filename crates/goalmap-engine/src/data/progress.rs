use super::task::{SharedTask, TaskNode};

/// Completion fraction of a single top-level task.
///
/// A checked task counts as complete regardless of its subtasks; otherwise
/// it is the share of checked subtasks (or 0.0 for a childless task).
pub fn task_completion(task: &TaskNode) -> f32 {
    if task.checked {
        return 1.0;
    }
    if task.children.is_empty() {
        return 0.0;
    }
    let done = task.children.iter().filter(|c| c.borrow().checked).count();
    done as f32 / task.children.len() as f32
}

/// Aggregate progress of a note: mean completion over its top-level tasks.
/// An empty task list yields 0.0.
pub fn compute_progress(tasks: &[SharedTask]) -> f32 {
    if tasks.is_empty() {
        return 0.0;
    }
    let total: f32 = tasks.iter().map(|t| task_completion(&t.borrow())).sum();
    (total / tasks.len() as f32).clamp(0.0, 1.0)
}
