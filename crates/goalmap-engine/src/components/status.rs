use crate::data::TaskNode;

/// Done / cancelled flags of a body, mirroring `checked` / `cancelled` of its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub done: bool,
    pub cancelled: bool,
}

impl Status {
    pub fn of(task: &TaskNode) -> Self {
        Self {
            done: task.checked,
            cancelled: task.cancelled,
        }
    }
}

/// A partial status change. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub done: Option<bool>,
    pub cancelled: Option<bool>,
}

impl StatusUpdate {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            cancelled: None,
        }
    }

    pub fn cancelled(cancelled: bool) -> Self {
        Self {
            done: None,
            cancelled: Some(cancelled),
        }
    }

    /// A cancelled body is never done: cancelling always clears `done`.
    pub fn normalized(self) -> Self {
        match self.cancelled {
            Some(true) => Self {
                done: Some(false),
                cancelled: Some(true),
            },
            _ => self,
        }
    }
}

/// Pointer interaction state of a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Normal,
    Hovered,
    Pinned,
}

/// What a status mutation did and who has to hear about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusOutcome {
    /// At least one field actually changed (the body needs a repaint).
    pub changed: bool,
    /// The owning planet must recompute its aggregate status.
    pub notify_parent: bool,
    /// The host should persist the task tree.
    pub request_save: bool,
}

impl StatusOutcome {
    /// Outcome of a change that actually happened.
    pub(crate) fn applied(from_parent: bool, silent: bool) -> Self {
        Self {
            changed: true,
            notify_parent: !from_parent,
            request_save: !silent,
        }
    }
}
