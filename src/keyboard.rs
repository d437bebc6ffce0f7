use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, VK_CONTROL, VK_LWIN, VK_RWIN, VK_SHIFT,
};
use windows::Win32::UI::WindowsAndMessaging::*;

use keymouse::state::{Decision, InputEvent, KeyAction, Modifiers};

use crate::hook;
use crate::injector::SIMULATED_EVENT_MARKER;

/// Low-level keyboard hook, uninstalled on drop.
pub struct KeyboardHook {
    hook_handle: HHOOK,
}

impl KeyboardHook {
    pub fn new() -> anyhow::Result<Self> {
        unsafe {
            let hook = SetWindowsHookExA(WH_KEYBOARD_LL, Some(Self::keyboard_proc), None, 0)?;

            if hook.0.is_null() {
                anyhow::bail!("Failed to set keyboard hook.");
            }

            Ok(Self { hook_handle: hook })
        }
    }

    unsafe extern "system" fn keyboard_proc(
        code: i32,
        w_param: WPARAM,
        l_param: LPARAM,
    ) -> LRESULT {
        if code < 0 {
            return unsafe { CallNextHookEx(None, code, w_param, l_param) };
        }

        let kb_struct = unsafe { &*(l_param.0 as *const KBDLLHOOKSTRUCT) };

        // Skip simulated events
        if kb_struct.dwExtraInfo == SIMULATED_EVENT_MARKER {
            return unsafe { CallNextHookEx(None, code, w_param, l_param) };
        }

        let action = match w_param.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => KeyAction::Down,
            WM_KEYUP | WM_SYSKEYUP => KeyAction::Up,
            _ => return unsafe { CallNextHookEx(None, code, w_param, l_param) },
        };

        let event = InputEvent::Key {
            code: kb_struct.vkCode,
            action,
            modifiers: current_modifiers(kb_struct),
        };

        if hook::dispatch(&event) == Decision::Suppress {
            return LRESULT(1); // block raw key event
        }

        unsafe { CallNextHookEx(None, code, w_param, l_param) }
    }
}

/// Modifier state at the time of the event.
///
/// ALT comes from the event flags; the others are read from the async key
/// state, which low-level hooks see before the event is processed.
fn current_modifiers(kb_struct: &KBDLLHOOKSTRUCT) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    if kb_struct.flags.0 & LLKHF_ALTDOWN.0 != 0 {
        modifiers = modifiers | Modifiers::ALT;
    }
    if is_held(VK_CONTROL.0) {
        modifiers = modifiers | Modifiers::CTRL;
    }
    if is_held(VK_SHIFT.0) {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if is_held(VK_LWIN.0) || is_held(VK_RWIN.0) {
        modifiers = modifiers | Modifiers::META;
    }
    modifiers
}

#[inline(always)]
fn is_held(vk: u16) -> bool {
    unsafe { GetAsyncKeyState(vk as i32) as u16 & 0x8000 != 0 }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook_handle);
        }
    }
}
