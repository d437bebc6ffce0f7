//! Cursor motion model.
//!
//! Turns held direction flags into cursor displacement using a deadzone
//! followed by a linear ease-in from `start_speed` to `max_speed`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::AccelerationConfig;
use crate::state::Direction;
use crate::vector::Vec2;

/// Screen extent the cursor is clamped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline(always)]
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(0.0, self.width, 0.0, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// Level-triggered snapshot of the keys driving the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dragging: bool,
}

impl InputState {
    /// Unit direction of travel. Diagonals are normalized so they are no
    /// faster than a single axis; opposite keys cancel.
    pub fn direction(&self) -> Vec2 {
        let mut raw = Vec2::ZERO;
        if self.up {
            raw.y -= 1.0;
        }
        if self.down {
            raw.y += 1.0;
        }
        if self.left {
            raw.x -= 1.0;
        }
        if self.right {
            raw.x += 1.0;
        }
        raw.normalize()
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// [`InputState`] shared between the event thread (writer) and the motion
/// loop (reader).
#[derive(Debug, Default)]
pub struct SharedInput {
    up: AtomicBool,
    down: AtomicBool,
    left: AtomicBool,
    right: AtomicBool,
    dragging: AtomicBool,
}

impl SharedInput {
    #[inline(always)]
    pub fn set_direction(&self, direction: Direction, held: bool) {
        let flag = match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        };
        flag.store(held, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.store(dragging, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn snapshot(&self) -> InputState {
        InputState {
            up: self.up.load(Ordering::Relaxed),
            down: self.down.load(Ordering::Relaxed),
            left: self.left.load(Ordering::Relaxed),
            right: self.right.load(Ordering::Relaxed),
            dragging: self.dragging.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        for flag in [
            &self.up,
            &self.down,
            &self.left,
            &self.right,
            &self.dragging,
        ] {
            flag.store(false, Ordering::Relaxed);
        }
    }
}

/// Cursor position packed into one atomic word so both axes update together.
#[derive(Debug)]
pub struct AtomicCursor(AtomicU64);

impl AtomicCursor {
    pub fn new(position: Vec2) -> Self {
        Self(AtomicU64::new(Self::pack(position)))
    }

    #[inline(always)]
    pub fn load(&self) -> Vec2 {
        Self::unpack(self.0.load(Ordering::Acquire))
    }

    #[inline(always)]
    pub fn store(&self, position: Vec2) {
        self.0.store(Self::pack(position), Ordering::Release);
    }

    #[inline(always)]
    fn pack(position: Vec2) -> u64 {
        (u64::from(position.x.to_bits()) << 32) | u64::from(position.y.to_bits())
    }

    #[inline(always)]
    fn unpack(bits: u64) -> Vec2 {
        Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
    }
}

impl Default for AtomicCursor {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// Speed in pixels per second after `held_time` seconds of holding, or
/// `None` while still inside the deadzone.
#[inline]
pub fn ramp_speed(config: &AccelerationConfig, held_time: f32) -> Option<f32> {
    if held_time < config.deadzone_time {
        return None;
    }
    let effective_hold = held_time - config.deadzone_time;
    let ramp = (effective_hold / config.ramp_time).min(1.0);
    Some(config.start_speed + (config.max_speed - config.start_speed) * ramp)
}

/// Motion state owned by the motion loop.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: AccelerationConfig,
    bounds: ScreenBounds,
    held_time: f32,
}

impl MotionModel {
    pub fn new(config: AccelerationConfig, bounds: ScreenBounds) -> Self {
        Self {
            config,
            bounds,
            held_time: 0.0,
        }
    }

    /// Seconds any direction has been continuously held.
    pub fn held_time(&self) -> f32 {
        self.held_time
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    /// Advances one tick of `dt` seconds from `position`.
    ///
    /// Returns the new clamped position when the cursor should move, `None`
    /// when nothing is held or the hold is still inside the deadzone.
    pub fn step(&mut self, input: &InputState, position: Vec2, dt: f32) -> Option<Vec2> {
        let direction = input.direction();
        if direction.is_zero() {
            self.held_time = 0.0;
            return None;
        }

        self.held_time += dt;
        let speed = ramp_speed(&self.config, self.held_time)?;
        Some(self.bounds.clamp(position + direction * (speed * dt)))
    }
}
