use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::*;

use keymouse::state::InputEvent;
use keymouse::vector::Vec2;

use crate::hook;
use crate::injector::SIMULATED_EVENT_MARKER;

/// Low-level mouse hook tracking the physical pointer, uninstalled on drop.
pub struct MouseHook {
    hook_handle: HHOOK,
}

impl MouseHook {
    pub fn new() -> anyhow::Result<Self> {
        unsafe {
            let hook = SetWindowsHookExA(WH_MOUSE_LL, Some(Self::mouse_proc), None, 0)?;

            if hook.0.is_null() {
                anyhow::bail!("Failed to set mouse hook.");
            }

            Ok(Self { hook_handle: hook })
        }
    }

    unsafe extern "system" fn mouse_proc(code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
        if code >= 0 && w_param.0 as u32 == WM_MOUSEMOVE {
            let mouse_struct = unsafe { &*(l_param.0 as *const MSLLHOOKSTRUCT) };

            // Our own moves already updated the cursor.
            if mouse_struct.dwExtraInfo != SIMULATED_EVENT_MARKER {
                let pt = mouse_struct.pt;
                // Physical mouse input is never suppressed.
                let _ = hook::dispatch(&InputEvent::MouseMoved(Vec2::new(
                    pt.x as f32,
                    pt.y as f32,
                )));
            }
        }

        unsafe { CallNextHookEx(None, code, w_param, l_param) }
    }
}

impl Drop for MouseHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook_handle);
        }
    }
}
