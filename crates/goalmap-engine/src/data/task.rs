//! Task Node / Note data contract shared with the persistence layer.
//!
//! The tree is reference-counted so bodies can hold the very node they
//! render: a status flip made through a body writes straight into the
//! note that the host will later save.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Shared, mutable handle to one node of a note's task tree.
pub type SharedTask = Rc<RefCell<TaskNode>>;

/// One task (or subtask) of a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub children: Vec<SharedTask>,
}

impl TaskNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TaskNode>) -> Self {
        self.children = children.into_iter().map(TaskNode::shared).collect();
        self
    }

    /// Wrap into a shared handle.
    pub fn shared(self) -> SharedTask {
        Rc::new(RefCell::new(self))
    }
}

/// A sticky note: title plus top-level tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<SharedTask>,
}

impl Note {
    pub fn new(title: impl Into<String>, tasks: impl IntoIterator<Item = TaskNode>) -> Self {
        Self {
            title: title.into(),
            tasks: tasks.into_iter().map(TaskNode::shared).collect(),
        }
    }

    /// Parse a note from its JSON persistence shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the (possibly written-through) note back to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Total number of direct subtasks across all top-level tasks.
    pub fn subtask_count(&self) -> usize {
        self.tasks.iter().map(|t| t.borrow().children.len()).sum()
    }
}
