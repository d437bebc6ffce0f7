#[cfg(windows)]
mod hook;
#[cfg(windows)]
mod injector;
#[cfg(windows)]
mod keyboard;
#[cfg(windows)]
mod mouse;
mod permission;
#[cfg(windows)]
mod signal;

use std::fmt::Write as _;
use std::process::ExitCode;

use anyhow::Result;
use keymouse::config::AppConfig;
use keymouse::state::parsing::vk_to_key_name;
use keymouse::state::{Bindings, PermissionGate};
use permission::InputDesktopGate;

/// Exit status when the process may not hook or inject input.
const EXIT_PERMISSION_DENIED: u8 = 1;
/// Exit status when the motion loop could not be torn down at exit.
#[cfg_attr(not(windows), allow(dead_code))]
const EXIT_TEARDOWN_FAILED: u8 = 2;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keymouse=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<ExitCode> {
    let config = AppConfig::from_env()?;
    let bindings = config.bindings.resolve()?;

    if let Err(e) = InputDesktopGate.check() {
        eprintln!("ERROR: {e}");
        return Ok(ExitCode::from(EXIT_PERMISSION_DENIED));
    }

    platform::run(config, bindings)
}

#[cfg_attr(not(windows), allow(dead_code))]
fn controls_banner(bindings: &Bindings) -> String {
    let mut banner = String::from("keymouse is running.\n");
    let _ = writeln!(banner, "  {:<12} Toggle intercepting mode", bindings.toggle.to_string());
    let _ = writeln!(banner, "  {:<12} Quit", bindings.quit.to_string());
    for (code, role) in bindings.iter() {
        let _ = writeln!(banner, "  {:<12} {}", vk_to_key_name(code), role);
    }
    banner
}

#[cfg(windows)]
mod platform {
    use std::process::ExitCode;
    use std::sync::Arc;
    use std::thread;

    use anyhow::{Context, Result};
    use windows::Win32::Foundation::POINT;
    use windows::Win32::Media::{timeBeginPeriod, timeEndPeriod};
    use windows::Win32::UI::WindowsAndMessaging::{
        GetCursorPos, GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN,
    };

    use keymouse::config::AppConfig;
    use keymouse::motion::ScreenBounds;
    use keymouse::state::{Bindings, Interceptor, Mode, MotionSettings, Notification};
    use keymouse::vector::Vec2;

    use crate::injector::SendInputSink;
    use crate::{EXIT_PERMISSION_DENIED, EXIT_TEARDOWN_FAILED, hook, signal};

    const HOOK_THREAD_NAME: &str = "input_hook";

    pub fn run(config: AppConfig, bindings: Bindings) -> Result<ExitCode> {
        // Request 1ms timer resolution so the tick sleep is precise
        unsafe { timeBeginPeriod(1) };
        let result = run_hooked(config, bindings);
        unsafe { timeEndPeriod(1) };
        result
    }

    fn run_hooked(config: AppConfig, bindings: Bindings) -> Result<ExitCode> {
        signal::set_control_ctrl_handler().context("Failed to install console handler")?;

        let bounds = screen_bounds();
        let start = cursor_position().unwrap_or_else(|| bounds.center());
        tracing::debug!(?bounds, ?start, "Screen geometry");

        let banner = crate::controls_banner(&bindings);
        let (notification_tx, notification_rx) = crossbeam_channel::unbounded();
        let interceptor = Interceptor::new(
            bindings,
            MotionSettings::from_config(&config, bounds),
            Arc::new(SendInputSink::new(bounds)),
            start,
        )
        .with_notifications(notification_tx);

        // Hooks must be installed on the thread that pumps their messages
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let hook_thread = thread::Builder::new()
            .name(HOOK_THREAD_NAME.to_string())
            .spawn(move || hook::run(interceptor, ready_tx))
            .context("Failed to spawn hook thread")?;

        if let Ok(Err(e)) = ready_rx.recv() {
            eprintln!("ERROR: {e}");
            let _ = hook_thread.join();
            return Ok(ExitCode::from(EXIT_PERMISSION_DENIED));
        }

        println!("{banner}");

        // Ends once the hook thread drops the interceptor.
        for notification in notification_rx.iter() {
            match notification {
                Notification::ModeChanged(Mode::Intercepting) => {
                    println!("Intercepting mode: ON")
                }
                Notification::ModeChanged(Mode::Passive) => println!("Intercepting mode: OFF"),
                Notification::Exiting => println!("Exiting..."),
            }
        }

        let teardown = hook_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Hook thread panicked"))?;

        match teardown {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!("ERROR: {e}");
                Ok(ExitCode::from(EXIT_TEARDOWN_FAILED))
            }
        }
    }

    fn screen_bounds() -> ScreenBounds {
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        ScreenBounds::new(width as f32, height as f32)
    }

    fn cursor_position() -> Option<Vec2> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.ok()?;
        Some(Vec2::new(point.x as f32, point.y as f32))
    }
}

#[cfg(not(windows))]
mod platform {
    use std::process::ExitCode;

    use anyhow::Result;
    use keymouse::config::AppConfig;
    use keymouse::state::Bindings;

    pub fn run(_config: AppConfig, _bindings: Bindings) -> Result<ExitCode> {
        anyhow::bail!("no input backend for this platform")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_hotkeys_and_bindings() {
        let banner = controls_banner(&Bindings::default());
        assert!(banner.contains("ALT+SPACE"));
        assert!(banner.contains("ALT+ESCAPE"));
        assert!(banner.contains("Move Up"));
        assert!(banner.contains("Left click"));
        assert!(banner.contains("Scroll down 3"));
        assert_eq!(banner.lines().count(), 3 + Bindings::default().len());
    }
}
