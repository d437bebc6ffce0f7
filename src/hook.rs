//! Hook thread: owns the interceptor and the low-level hooks feeding it.
//!
//! Low-level hook callbacks run on the thread that installed them, inside
//! its message loop. The interceptor therefore lives in a thread-local slot
//! on that thread rather than behind a process-wide static.

use std::cell::RefCell;

use crossbeam_channel::Sender;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::*;

use keymouse::error::{InterceptError, Result};
use keymouse::state::{Decision, InputEvent, Interceptor};
use keymouse::util::unlikely;

use crate::keyboard::KeyboardHook;
use crate::mouse::MouseHook;
use crate::signal;

thread_local! {
    static INTERCEPTOR: RefCell<Option<Interceptor>> = const { RefCell::new(None) };
}

/// Feeds one event to the interceptor of the current thread.
///
/// Forwards when no interceptor is installed or the slot is already borrowed
/// (a hook re-entered while an effect was being applied).
pub fn dispatch(event: &InputEvent) -> Decision {
    INTERCEPTOR.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return Decision::Forward;
        };
        let Some(interceptor) = slot.as_mut() else {
            return Decision::Forward;
        };

        let decision = interceptor.handle_event(event);
        if unlikely(interceptor.shared().should_exit()) {
            unsafe { PostQuitMessage(0) };
        }
        decision
    })
}

/// Installs both hooks and pumps messages until quit.
///
/// Hook installation failures are reported through `ready` as
/// [`InterceptError::PermissionDenied`]. Returns the result of tearing down
/// the motion loop once the message loop ends.
pub fn run(interceptor: Interceptor, ready: Sender<Result<()>>) -> Result<()> {
    // Force create message queue
    unsafe {
        let mut msg = MSG::default();
        let _ = PeekMessageA(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    INTERCEPTOR.with(|slot| *slot.borrow_mut() = Some(interceptor));

    let hooks = KeyboardHook::new().and_then(|keyboard| Ok((keyboard, MouseHook::new()?)));
    let hooks = match hooks {
        Ok(hooks) => hooks,
        Err(e) => {
            let reason = format!("failed to install input hooks: {e:#}");
            let _ = ready.send(Err(InterceptError::PermissionDenied(reason.clone())));
            take_interceptor();
            return Err(InterceptError::PermissionDenied(reason));
        }
    };

    signal::set_hook_thread(unsafe { GetCurrentThreadId() });
    let _ = ready.send(Ok(()));
    tracing::debug!("Input hooks installed");

    unsafe {
        let mut msg = MSG::default();
        loop {
            let result = GetMessageA(&mut msg, None, 0, 0);

            if result.0 == 0 || result.0 == -1 {
                break;
            }

            let _ = TranslateMessage(&msg);
            DispatchMessageA(&msg);
        }
    }

    drop(hooks);
    signal::set_hook_thread(0);

    match take_interceptor() {
        Some(mut interceptor) => interceptor.shutdown(),
        None => Ok(()),
    }
}

fn take_interceptor() -> Option<Interceptor> {
    INTERCEPTOR.with(|slot| slot.borrow_mut().take())
}
