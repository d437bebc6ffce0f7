use std::sync::atomic::{AtomicU32, Ordering};

use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Console::*;
use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageA, WM_QUIT};
use windows::core::*;

/// Thread running the hook message loop, 0 until it has started.
static HOOK_THREAD_ID: AtomicU32 = AtomicU32::new(0);

pub fn set_hook_thread(thread_id: u32) {
    HOOK_THREAD_ID.store(thread_id, Ordering::Release);
}

/// Asks the hook thread to leave its message loop.
///
/// Returns false when no hook thread is running yet.
pub fn request_shutdown() -> bool {
    let thread_id = HOOK_THREAD_ID.load(Ordering::Acquire);
    if thread_id == 0 {
        return false;
    }
    unsafe { PostThreadMessageA(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)).is_ok() }
}

pub fn set_control_ctrl_handler() -> Result<()> {
    unsafe { SetConsoleCtrlHandler(Some(console_handler), true) }
}

#[allow(non_snake_case)]
unsafe extern "system" fn console_handler(ctrl_type: u32) -> BOOL {
    match ctrl_type {
        CTRL_C_EVENT | CTRL_BREAK_EVENT | CTRL_CLOSE_EVENT => {
            if !request_shutdown() {
                std::process::exit(0); // force shutdown
            }
            BOOL(1) // Event has been handled
        }
        _ => BOOL(0), // Leave other events to the default handler
    }
}
