//! Type definitions for input events, key bindings and pointer output.

use std::fmt;
use std::ops::BitOr;

use smallvec::SmallVec;

use crate::error::{InterceptError, Result};
use crate::vector::Vec2;

use super::parsing::{self, vk};

/// Virtual key code as reported by the raw input source.
pub type KeyCode = u32;

/// Modifier keys held while a key event was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const META: Self = Self(1 << 3);

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every modifier in `other` is also set in `self`.
    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Up,
}

/// Raw input event delivered by the input source, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key {
        code: KeyCode,
        action: KeyAction,
        modifiers: Modifiers,
    },
    /// Physical pointer moved to an absolute screen position.
    MouseMoved(Vec2),
}

impl InputEvent {
    pub fn key_down(code: KeyCode, modifiers: Modifiers) -> Self {
        InputEvent::Key {
            code,
            action: KeyAction::Down,
            modifiers,
        }
    }

    pub fn key_up(code: KeyCode, modifiers: Modifiers) -> Self {
        InputEvent::Key {
            code,
            action: KeyAction::Up,
            modifiers,
        }
    }
}

/// Interception mode. Derived from whether a motion loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Passive,
    Intercepting,
}

/// What the input source should do with the original event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Forward,
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Meaning of a bound key while intercepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Move(Direction),
    Click(MouseButton),
    /// Signed scroll line count emitted on key-down.
    Scroll(i32),
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Move(direction) => write!(f, "Move {direction:?}"),
            KeyRole::Click(button) => write!(f, "{button:?} click"),
            KeyRole::Scroll(lines) if *lines >= 0 => write!(f, "Scroll up {lines}"),
            KeyRole::Scroll(lines) => write!(f, "Scroll down {}", lines.unsigned_abs()),
        }
    }
}

/// Side effect requested by a state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Arm,
    Disarm,
    Quit,
    SetDirection(Direction, bool),
    SetDragging(bool),
    Button(MouseButton, bool),
    Scroll(i32),
    TrackCursor(Vec2),
}

/// Result of feeding one event through the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub decision: Decision,
    pub effects: SmallVec<[Effect; 2]>,
}

impl Transition {
    pub fn forward() -> Self {
        Self {
            decision: Decision::Forward,
            effects: SmallVec::new(),
        }
    }

    pub fn suppress() -> Self {
        Self {
            decision: Decision::Suppress,
            effects: SmallVec::new(),
        }
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Key plus required modifiers, e.g. `ALT+SPACE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Extra modifiers held on top of the required ones still match.
    #[inline(always)]
    pub fn matches(&self, code: KeyCode, modifiers: Modifiers) -> bool {
        code == self.key && modifiers.contains(self.modifiers)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "CTRL"),
            (Modifiers::ALT, "ALT"),
            (Modifiers::SHIFT, "SHIFT"),
            (Modifiers::META, "WIN"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", parsing::vk_to_key_name(self.key))
    }
}

/// Key layout used by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    pub toggle: Hotkey,
    pub quit: Hotkey,
    keys: SmallVec<[(KeyCode, KeyRole); 8]>,
}

impl Bindings {
    /// Creates a layout with only the two hotkeys bound.
    pub fn new(toggle: Hotkey, quit: Hotkey) -> Self {
        Self {
            toggle,
            quit,
            keys: SmallVec::new(),
        }
    }

    /// Binds `code` to `role`. A key may carry only one role.
    pub fn bind(&mut self, code: KeyCode, role: KeyRole) -> Result<()> {
        if self.keys.iter().any(|(bound, _)| *bound == code) {
            return Err(InterceptError::InvalidBinding(format!(
                "{} is bound more than once",
                parsing::vk_to_key_name(code)
            )));
        }
        self.keys.push((code, role));
        Ok(())
    }

    #[inline(always)]
    pub fn role(&self, code: KeyCode) -> Option<KeyRole> {
        self.keys
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, role)| *role)
    }

    /// Bound keys in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, KeyRole)> + '_ {
        self.keys.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Default scroll distance per key press, in lines.
pub const DEFAULT_SCROLL_LINES: i32 = 3;

impl Default for Bindings {
    fn default() -> Self {
        let layout = [
            (vk::I, KeyRole::Move(Direction::Up)),
            (vk::K, KeyRole::Move(Direction::Down)),
            (vk::J, KeyRole::Move(Direction::Left)),
            (vk::L, KeyRole::Move(Direction::Right)),
            (vk::Q, KeyRole::Click(MouseButton::Left)),
            (vk::E, KeyRole::Click(MouseButton::Right)),
            (vk::W, KeyRole::Scroll(DEFAULT_SCROLL_LINES)),
            (vk::S, KeyRole::Scroll(-DEFAULT_SCROLL_LINES)),
        ];

        Self {
            toggle: Hotkey::new(vk::SPACE, Modifiers::ALT),
            quit: Hotkey::new(vk::ESCAPE, Modifiers::ALT),
            keys: layout.into_iter().collect(),
        }
    }
}

/// Synthetic pointer output. Implementations inject events into the system.
///
/// Calls are fire-and-forget and may come from the motion loop thread as
/// well as the event-delivery thread.
pub trait PointerSink: Send + Sync {
    /// Absolute move; `dragging` is set while the synthetic left button is held.
    fn move_to(&self, position: Vec2, dragging: bool);
    fn button(&self, button: MouseButton, pressed: bool, position: Vec2);
    /// Positive values scroll up.
    fn scroll(&self, lines: i32);
}

/// Startup check that the process may observe and inject input.
pub trait PermissionGate {
    fn check(&self) -> Result<()>;
}

/// User-facing notifications emitted by the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ModeChanged(Mode),
    Exiting,
}
