use crate::util::unlikely;

use super::types::*;

/// Maps one raw event to a forwarding decision plus the effects to apply.
///
/// Pure: the caller owns all state and applies the returned effects.
#[inline]
pub fn transition(mode: Mode, event: &InputEvent, bindings: &Bindings) -> Transition {
    let (code, action, modifiers) = match *event {
        // Pointer moves only refresh the baseline, in both modes.
        InputEvent::MouseMoved(position) => {
            return Transition::forward().with(Effect::TrackCursor(position));
        }
        InputEvent::Key {
            code,
            action,
            modifiers,
        } => (code, action, modifiers),
    };
    let pressed = action == KeyAction::Down;

    if unlikely(bindings.toggle.matches(code, modifiers)) {
        let transition = Transition::suppress();
        if !pressed {
            return transition;
        }
        return match mode {
            Mode::Passive => transition.with(Effect::Arm),
            Mode::Intercepting => transition.with(Effect::Disarm),
        };
    }

    if unlikely(bindings.quit.matches(code, modifiers)) {
        let transition = Transition::suppress();
        return if pressed {
            transition.with(Effect::Quit)
        } else {
            transition
        };
    }

    if mode == Mode::Passive {
        return Transition::forward();
    }

    match bindings.role(code) {
        Some(KeyRole::Move(direction)) => {
            Transition::suppress().with(Effect::SetDirection(direction, pressed))
        }
        Some(KeyRole::Click(MouseButton::Left)) => Transition::suppress()
            .with(Effect::SetDragging(pressed))
            .with(Effect::Button(MouseButton::Left, pressed)),
        Some(KeyRole::Click(button)) => {
            Transition::suppress().with(Effect::Button(button, pressed))
        }
        Some(KeyRole::Scroll(lines)) => {
            let transition = Transition::suppress();
            if pressed {
                transition.with(Effect::Scroll(lines))
            } else {
                transition
            }
        }
        None => Transition::forward(),
    }
}
