use goalmap_engine::bridge::protocol::{labels_json, write_header, HEADER_FLOATS};
use goalmap_engine::{Color, GoalMap, InputEvent, MapConfig, Note};

/// Accent used when the host sends something unparsable.
const FALLBACK_ACCENT: Color = Color::rgb(1.0, 0.55, 0.0);

/// Owns the map plus the buffers the shell reads after every frame.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exports free
/// functions, because wasm-bindgen cannot export it directly.
pub struct MapRunner {
    map: GoalMap,
    header: [f32; HEADER_FLOATS],
    labels: String,
    vertex_count: usize,
    saves_reported: u64,
}

impl MapRunner {
    /// Parse the note (and optional partial config) and build the map.
    pub fn open(note_json: &str, accent_hex: &str, config_json: Option<&str>, seed: u64) -> Result<Self, serde_json::Error> {
        let note = Note::from_json(note_json)?;
        let config = match config_json {
            Some(json) if !json.trim().is_empty() => MapConfig::from_json(json)?,
            _ => MapConfig::default(),
        };
        let accent = Color::from_hex(accent_hex).unwrap_or_else(|| {
            log::warn!("bad accent color {accent_hex:?}, using fallback");
            FALLBACK_ACCENT
        });

        let mut runner = Self {
            map: GoalMap::open(note, accent, config, seed),
            header: [0.0; HEADER_FLOATS],
            labels: String::from("[]"),
            vertex_count: 0,
            saves_reported: 0,
        };
        runner.repaint();
        Ok(runner)
    }

    pub fn map(&self) -> &GoalMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut GoalMap {
        &mut self.map
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.map.push_input(event);
    }

    /// Run one host frame. Returns true if a new frame was painted.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.map.tick(dt);
        if !self.map.take_repaint_request() {
            return false;
        }
        self.repaint();
        true
    }

    /// Save requests made since the last call. The shell fires its
    /// persistence hook for these once the runner is no longer borrowed.
    pub fn take_pending_saves(&mut self) -> u64 {
        let total = self.map.save_requests();
        let pending = total - self.saves_reported;
        self.saves_reported = total;
        pending
    }

    /// Fold fresh note JSON into the live map.
    pub fn update_snapshot(&mut self, note_json: &str) -> Result<(), serde_json::Error> {
        let note = Note::from_json(note_json)?;
        self.map.update_snapshot(note);
        Ok(())
    }

    fn repaint(&mut self) {
        #[cfg(feature = "vectors")]
        {
            self.vertex_count = self.map.paint().vertex_count();
        }
        write_header(&self.map, self.vertex_count, &mut self.header);
        match labels_json(&self.map) {
            Ok(json) => self.labels = json,
            Err(e) => log::warn!("label export failed: {e}"),
        }
    }

    // ---- Accessors for the shell ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    #[cfg(feature = "vectors")]
    pub fn vertex_ptr(&self) -> *const f32 {
        self.map.canvas().buffer_ptr()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count as u32
    }

    pub fn labels_json(&self) -> &str {
        &self.labels
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        self.map.note().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalmap_engine::bridge::protocol::{HEADER_PROGRESS, HEADER_VERTEX_COUNT};

    const NOTE: &str = r#"{
        "title": "Move - 01.05.2025",
        "tasks": [
            { "text": "boxes", "checked": true },
            { "text": "van", "children": [ { "text": "book", "checked": true }, { "text": "pay" } ] }
        ]
    }"#;

    fn runner() -> MapRunner {
        MapRunner::open(NOTE, "#3366ff", Some(r#"{ "star_count": 20 }"#), 7).unwrap()
    }

    #[test]
    fn open_paints_first_frame() {
        let r = runner();
        assert!((r.header()[HEADER_PROGRESS] - 0.75).abs() < 1e-6);
        assert_eq!(r.header()[HEADER_VERTEX_COUNT], r.vertex_count() as f32);
        assert!(r.labels_json().contains("Move"));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(MapRunner::open("{ nope", "#fff000", None, 1).is_err());
        assert!(MapRunner::open(NOTE, "#fff000", Some("{ \"star_count\": -1 }"), 1).is_err());
        assert!(MapRunner::open(NOTE, "not a color", None, 1).is_ok());
    }

    #[test]
    fn snapshot_round_trips_written_through_status() {
        let mut r = runner();
        let planet = r.map().scene().planets[1].id;
        r.map_mut().set_planet_status(planet, goalmap_engine::StatusUpdate::done(true));
        let json = r.snapshot_json().unwrap();
        let note = Note::from_json(&json).unwrap();
        assert!(note.tasks[1].borrow().checked);
        assert!(note.tasks[1].borrow().children.iter().all(|c| c.borrow().checked));
    }

    #[test]
    fn pending_saves_are_taken_once() {
        let mut r = runner();
        assert_eq!(r.take_pending_saves(), 0);
        let planet = r.map().scene().planets[1].id;
        r.push_input(InputEvent::Menu {
            target: goalmap_engine::MenuTarget::Planet(planet),
            action: goalmap_engine::MenuAction::ToggleDone,
        });
        r.tick(0.02);
        assert_eq!(r.take_pending_saves(), 1);
        assert_eq!(r.take_pending_saves(), 0);
    }

    #[test]
    fn tick_repaints_when_needed() {
        let mut r = runner();
        assert!(r.tick(0.1));
        r.update_snapshot(NOTE).unwrap();
        assert!(r.tick(0.0));
        assert!(!r.tick(0.0));
    }
}
