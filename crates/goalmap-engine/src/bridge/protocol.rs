/// Frame header shared with the host shell.
/// Must stay in sync with the TypeScript `protocol.ts`.
///
/// Layout (all values f32):
/// ```text
/// [0] protocol version
/// [1] vertex count (triangle list, 6 floats per vertex)
/// [2..6] viewport left, top, width, height (scene units)
/// [6] progress 0.0 - 1.0
/// [7] wallpaper mode (0.0 / 1.0)
/// [8] save requests issued so far
/// [9..16] reserved
/// ```
/// Labels travel separately as JSON, see [`LabelWire`].

use serde::Serialize;

use crate::api::map::{GoalMap, MenuEntry};
use crate::core::scene::Label;
use crate::input::queue::MenuAction;

/// Number of floats in the header.
pub const HEADER_FLOATS: usize = 16;

pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_VERTEX_COUNT: usize = 1;
pub const HEADER_VIEWPORT: usize = 2;
pub const HEADER_PROGRESS: usize = 6;
pub const HEADER_WALLPAPER: usize = 7;
pub const HEADER_SAVE_REQUESTS: usize = 8;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per vertex in the paint buffer: x, y, r, g, b, a.
pub const VERTEX_FLOATS: usize = 6;

/// Fill `header` from the map's current state.
pub fn write_header(map: &GoalMap, vertex_count: usize, header: &mut [f32; HEADER_FLOATS]) {
    let vp = map.viewport();
    header.fill(0.0);
    header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    header[HEADER_VERTEX_COUNT] = vertex_count as f32;
    header[HEADER_VIEWPORT..HEADER_VIEWPORT + 4].copy_from_slice(&[vp.left, vp.top, vp.width, vp.height]);
    header[HEADER_PROGRESS] = map.progress();
    header[HEADER_WALLPAPER] = if map.wallpaper_mode() { 1.0 } else { 0.0 };
    header[HEADER_SAVE_REQUESTS] = map.save_requests() as f32;
}

/// A label as the shell draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelWire {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub struck: bool,
    pub emphasized: bool,
    pub opacity: f32,
}

impl From<&Label> for LabelWire {
    fn from(label: &Label) -> Self {
        Self {
            text: label.text.clone(),
            x: label.anchor.x,
            y: label.anchor.y,
            size: label.size,
            struck: label.struck,
            emphasized: label.emphasized,
            opacity: label.opacity,
        }
    }
}

/// Stable numeric codes for menu actions on the wire.
pub fn action_code(action: MenuAction) -> u32 {
    match action {
        MenuAction::ToggleDone => 0,
        MenuAction::ToggleCancelled => 1,
        MenuAction::Reroll => 2,
        MenuAction::ToggleWallpaper => 3,
    }
}

pub fn action_from_code(code: u32) -> Option<MenuAction> {
    match code {
        0 => Some(MenuAction::ToggleDone),
        1 => Some(MenuAction::ToggleCancelled),
        2 => Some(MenuAction::Reroll),
        3 => Some(MenuAction::ToggleWallpaper),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntryWire {
    pub action: u32,
    pub label: String,
}

impl From<&MenuEntry> for MenuEntryWire {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            action: action_code(entry.action),
            label: entry.label.clone(),
        }
    }
}

/// Labels of the current frame as a JSON array.
pub fn labels_json(map: &GoalMap) -> Result<String, serde_json::Error> {
    let labels: Vec<LabelWire> = map.labels().iter().map(LabelWire::from).collect();
    serde_json::to_string(&labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::MapConfig;
    use crate::api::types::Color;
    use crate::data::{Note, TaskNode};

    fn map() -> GoalMap {
        let note = Note::new("Trip", [TaskNode::new("tickets").checked(true), TaskNode::new("hotel")]);
        let config = MapConfig {
            star_count: 10,
            ..MapConfig::default()
        };
        GoalMap::open(note, Color::WHITE, config, 3)
    }

    #[test]
    fn header_carries_frame_state() {
        let map = map();
        let mut header = [f32::NAN; HEADER_FLOATS];
        write_header(&map, 42, &mut header);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_VERTEX_COUNT], 42.0);
        assert_eq!(header[HEADER_VIEWPORT + 2], map.viewport().width);
        assert!((header[HEADER_PROGRESS] - 0.5).abs() < 1e-6);
        assert_eq!(header[HEADER_WALLPAPER], 0.0);
        assert_eq!(header[HEADER_FLOATS - 1], 0.0);
    }

    #[test]
    fn action_codes_round_trip() {
        for code in 0..4 {
            let action = action_from_code(code).unwrap();
            assert_eq!(action_code(action), code);
        }
        assert_eq!(action_from_code(4), None);
    }

    #[test]
    fn labels_serialize_as_array() {
        let json = labels_json(&map()).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"text\":\"Trip\""));
        assert!(json.contains("\"text\":\"tickets\""));
    }
}
