use crate::api::types::BodyId;

/// Context-menu intents the shell can forward to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleDone,
    ToggleCancelled,
    Reroll,
    ToggleWallpaper,
}

/// What a context menu was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Planet(BodyId),
    Moon(BodyId),
    /// Empty space or the sun.
    Map,
}

/// Input events the map understands. Pointer coordinates are screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    /// Primary button pressed.
    PointerDown { x: f32, y: f32 },
    /// A context-menu entry was chosen.
    Menu { target: MenuTarget, action: MenuAction },
    ToggleWallpaper,
    /// Host surface resized, in pixels.
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// The host pushes events as they arrive; the map drains them once per frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
