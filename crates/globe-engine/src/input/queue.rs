/// Input event types the globe understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer dragged by (dx, dy) pixels while orbiting.
    OrbitDrag { dx: f32, dy: f32 },
    /// Wheel/pinch zoom. Positive moves closer.
    Zoom { delta: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// The viewport changed size (pixels).
    Resize { width: f32, height: f32 },
    /// A custom event from the UI layer (buttons, panels).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Key code of `D`, which toggles debug output.
pub const KEY_DEBUG: u32 = 68;

/// Custom kind: toggle region focus. With `c != 0`, `(a, b)` is the
/// region's (lat, lng); otherwise the configured default region is used.
pub const CUSTOM_TOGGLE_FOCUS: u32 = 1;

/// A queue of input events.
/// The host writes events into the queue; the runner drains them each frame.
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

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
