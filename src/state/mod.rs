//! Interception state management.
//!
//! [`Interceptor`] owns the motion loop handle and applies the effects
//! produced by [`handlers::transition`]. [`SharedState`] is the context the
//! event thread and the motion loop both see.

pub mod handlers;
pub mod parsing;
pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::Sender;
use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use crate::config::{AccelerationConfig, AppConfig};
use crate::error::{InterceptError, Result};
use crate::motion::{AtomicCursor, InputState, MotionModel, ScreenBounds, SharedInput};
use crate::scheduler::{Spawn, TickHandle, TickScheduler};
use crate::vector::Vec2;

pub use types::*;

/// Name of the motion loop thread.
pub const MOTION_THREAD_NAME: &str = "motion_loop";

/// State shared between the event-delivery thread and the motion loop.
#[derive(Debug, Default)]
pub struct SharedState {
    pub input: SharedInput,
    pub cursor: AtomicCursor,
    should_exit: AtomicBool,
}

impl SharedState {
    pub fn new(cursor: Vec2) -> Self {
        Self {
            input: SharedInput::default(),
            cursor: AtomicCursor::new(cursor),
            should_exit: AtomicBool::new(false),
        }
    }

    /// Signals the application to exit.
    pub fn exit(&self) {
        self.should_exit.store(true, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }
}

/// Motion parameters fixed for the session.
#[derive(Debug, Clone, Copy)]
pub struct MotionSettings {
    pub acceleration: AccelerationConfig,
    pub bounds: ScreenBounds,
    pub tick_period: Duration,
}

impl MotionSettings {
    pub fn from_config(config: &AppConfig, bounds: ScreenBounds) -> Self {
        Self {
            acceleration: config.acceleration,
            bounds,
            tick_period: config.tick_period(),
        }
    }
}

/// Keyboard-to-pointer interception state machine.
///
/// Intercepting exactly when a motion loop handle is held.
pub struct Interceptor {
    bindings: Bindings,
    acceleration: AccelerationConfig,
    bounds: ScreenBounds,
    scheduler: TickScheduler,
    shared: Arc<SharedState>,
    sink: Arc<dyn PointerSink>,
    motion_task: Option<TickHandle>,
    /// Hotkeys whose key-down was consumed and whose key-up is still due.
    pending_releases: SmallVec<[KeyCode; 2]>,
    notification_sender: Option<Sender<Notification>>,
}

impl Interceptor {
    /// Creates a passive interceptor with the cursor at `start`.
    pub fn new(
        bindings: Bindings,
        settings: MotionSettings,
        sink: Arc<dyn PointerSink>,
        start: Vec2,
    ) -> Self {
        Self {
            bindings,
            acceleration: settings.acceleration,
            bounds: settings.bounds,
            scheduler: TickScheduler::new(settings.tick_period),
            shared: Arc::new(SharedState::new(settings.bounds.clamp(start))),
            sink,
            motion_task: None,
            pending_releases: SmallVec::new(),
            notification_sender: None,
        }
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn Spawn>) -> Self {
        self.scheduler = self.scheduler.clone().with_spawner(spawner);
        self
    }

    pub fn with_notifications(mut self, sender: Sender<Notification>) -> Self {
        self.notification_sender = Some(sender);
        self
    }

    #[inline(always)]
    pub fn mode(&self) -> Mode {
        if self.motion_task.is_some() {
            Mode::Intercepting
        } else {
            Mode::Passive
        }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn cursor(&self) -> Vec2 {
        self.shared.cursor.load()
    }

    pub fn input(&self) -> InputState {
        self.shared.input.snapshot()
    }

    /// Feeds one raw event through the state machine.
    ///
    /// Runs on the event-delivery thread. Only a disarm blocks, for at most
    /// one tick while the motion loop is joined.
    ///
    /// A hotkey's key-up is consumed even when its modifiers were released
    /// first.
    pub fn handle_event(&mut self, event: &InputEvent) -> Decision {
        if let InputEvent::Key {
            code,
            action: KeyAction::Up,
            ..
        } = *event
            && let Some(index) = self.pending_releases.iter().position(|&k| k == code)
        {
            self.pending_releases.swap_remove(index);
            return Decision::Suppress;
        }

        let transition = handlers::transition(self.mode(), event, &self.bindings);
        if let InputEvent::Key {
            code,
            action: KeyAction::Down,
            modifiers,
        } = *event
            && (self.bindings.toggle.matches(code, modifiers)
                || self.bindings.quit.matches(code, modifiers))
            && !self.pending_releases.contains(&code)
        {
            self.pending_releases.push(code);
        }

        for effect in transition.effects {
            self.apply(effect);
        }
        transition.decision
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Arm => {
                if let Err(err) = self.arm() {
                    error!(%err, "Intercept mode not enabled");
                }
            }
            Effect::Disarm => {
                if let Err(err) = self.disarm() {
                    error!(%err, "Motion loop teardown failed");
                }
            }
            Effect::Quit => {
                info!("Quit hotkey pressed");
                self.shared.exit();
                self.notify(Notification::Exiting);
            }
            Effect::SetDirection(direction, held) => {
                self.shared.input.set_direction(direction, held);
            }
            Effect::SetDragging(dragging) => self.shared.input.set_dragging(dragging),
            Effect::Button(button, pressed) => {
                self.sink.button(button, pressed, self.shared.cursor.load());
            }
            Effect::Scroll(lines) => self.sink.scroll(lines),
            Effect::TrackCursor(position) => {
                self.shared.cursor.store(self.bounds.clamp(position));
            }
        }
    }

    /// Starts the motion loop. No-op when already intercepting.
    ///
    /// On failure the interceptor stays passive.
    pub fn arm(&mut self) -> Result<()> {
        if self.motion_task.is_some() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        let mut model = MotionModel::new(self.acceleration, self.bounds);

        let task = self
            .scheduler
            .start(MOTION_THREAD_NAME, move |dt| {
                let input = shared.input.snapshot();
                if let Some(position) = model.step(&input, shared.cursor.load(), dt) {
                    shared.cursor.store(position);
                    sink.move_to(position, input.dragging);
                }
            })
            .map_err(InterceptError::TaskCreation)?;

        self.motion_task = Some(task);
        debug!(period = ?self.scheduler.period(), "Motion loop started");
        self.notify(Notification::ModeChanged(Mode::Intercepting));
        Ok(())
    }

    /// Stops the motion loop and clears held input. No-op when passive.
    ///
    /// The handle is dropped even when the join fails, so the interceptor is
    /// always passive afterwards.
    pub fn disarm(&mut self) -> Result<()> {
        let Some(task) = self.motion_task.take() else {
            return Ok(());
        };

        let result = task.stop();

        let held = self.shared.input.snapshot();
        self.shared.input.clear();
        if held.dragging {
            self.sink
                .button(MouseButton::Left, false, self.shared.cursor.load());
        }

        debug!("Motion loop stopped");
        self.notify(Notification::ModeChanged(Mode::Passive));
        result
    }

    /// Tears down a live motion loop before exit.
    pub fn shutdown(&mut self) -> Result<()> {
        self.disarm()
    }

    fn notify(&self, notification: Notification) {
        if let Some(sender) = &self.notification_sender {
            let _ = sender.send(notification);
        }
    }
}

impl Drop for Interceptor {
    fn drop(&mut self) {
        if let Some(task) = self.motion_task.take()
            && let Err(err) = task.stop()
        {
            warn!(%err, "Motion loop teardown failed on drop");
        }
    }
}
