use windows::Win32::UI::Input::KeyboardAndMouse::*;

use keymouse::motion::ScreenBounds;
use keymouse::state::{MouseButton, PointerSink};
use keymouse::vector::Vec2;

/// Tag carried in `dwExtraInfo` of every injected event so the hooks can
/// skip them.
pub const SIMULATED_EVENT_MARKER: usize = 0x4659;

/// Extent of the normalized absolute coordinate space used by `SendInput`.
const ABSOLUTE_EXTENT: f32 = 65535.0;

/// Wheel units per scroll line.
const WHEEL_DELTA: i32 = 120;

/// Posts synthetic pointer events through `SendInput`.
pub struct SendInputSink {
    bounds: ScreenBounds,
}

impl SendInputSink {
    pub fn new(bounds: ScreenBounds) -> Self {
        Self { bounds }
    }

    #[inline]
    fn normalize(&self, position: Vec2) -> (i32, i32) {
        let p = self.bounds.clamp(position);
        let nx = p.x / self.bounds.width.max(1.0) * ABSOLUTE_EXTENT;
        let ny = p.y / self.bounds.height.max(1.0) * ABSOLUTE_EXTENT;
        (nx.round() as i32, ny.round() as i32)
    }

    #[inline]
    fn send(&self, dx: i32, dy: i32, mouse_data: i32, flags: MOUSE_EVENT_FLAGS) {
        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx,
                    dy,
                    mouseData: mouse_data as u32,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: SIMULATED_EVENT_MARKER,
                },
            },
        };

        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 0 {
            tracing::warn!(?flags, "SendInput rejected pointer event");
        }
    }
}

impl PointerSink for SendInputSink {
    fn move_to(&self, position: Vec2, _dragging: bool) {
        // A held button turns absolute moves into a drag on its own.
        let (dx, dy) = self.normalize(position);
        self.send(dx, dy, 0, MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE);
    }

    fn button(&self, button: MouseButton, pressed: bool, position: Vec2) {
        let flag = match (button, pressed) {
            (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
            (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
            (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
            (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
        };
        let (dx, dy) = self.normalize(position);
        self.send(dx, dy, 0, flag | MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE);
    }

    fn scroll(&self, lines: i32) {
        self.send(0, 0, lines.saturating_mul(WHEEL_DELTA), MOUSEEVENTF_WHEEL);
    }
}
