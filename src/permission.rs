use keymouse::error::{InterceptError, Result};
use keymouse::state::PermissionGate;

/// Checks that the interactive input desktop is reachable.
///
/// Fails on the secure desktop (UAC prompt, lock screen) and when a
/// lower-integrity process cannot hook or inject into the session.
pub struct InputDesktopGate;

#[cfg(windows)]
impl PermissionGate for InputDesktopGate {
    fn check(&self) -> Result<()> {
        use windows::Win32::System::StationsAndDesktops::*;

        let desktop = unsafe {
            OpenInputDesktop(
                DESKTOP_CONTROL_FLAGS(0),
                false,
                DESKTOP_HOOKCONTROL | DESKTOP_JOURNALPLAYBACK,
            )
        }
        .map_err(|e| InterceptError::PermissionDenied(format!("input desktop unavailable: {e}")))?;

        unsafe {
            let _ = CloseDesktop(desktop);
        }
        Ok(())
    }
}

#[cfg(not(windows))]
impl PermissionGate for InputDesktopGate {
    fn check(&self) -> Result<()> {
        Err(InterceptError::PermissionDenied(
            "global input hooks are only available on Windows".to_string(),
        ))
    }
}
