//! Key name parsing utilities.
//!
//! Key codes follow the Windows virtual-key numbering.

use super::types::{Hotkey, KeyCode, Modifiers};

/// Virtual key codes referenced by the default layout.
pub mod vk {
    use super::KeyCode;

    pub const ESCAPE: KeyCode = 0x1B;
    pub const SPACE: KeyCode = 0x20;
    pub const E: KeyCode = 0x45;
    pub const I: KeyCode = 0x49;
    pub const J: KeyCode = 0x4A;
    pub const K: KeyCode = 0x4B;
    pub const L: KeyCode = 0x4C;
    pub const Q: KeyCode = 0x51;
    pub const S: KeyCode = 0x53;
    pub const W: KeyCode = 0x57;
}

/// Converts virtual key code to key name string.
#[inline]
pub fn vk_to_key_name(vk: u32) -> String {
    match vk {
        // A-Z, 0-9
        0x41..=0x5A | 0x30..=0x39 => char::from_u32(vk)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        // Numpad 0-9
        0x60..=0x69 => format!("NUMPAD{}", vk - 0x60),
        // F1-F24
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        0x20 => "SPACE".to_string(),
        0x0D => "RETURN".to_string(),
        0x09 => "TAB".to_string(),
        0x1B => "ESCAPE".to_string(),
        0x08 => "BACK".to_string(),
        0x2E => "DELETE".to_string(),
        0x2D => "INSERT".to_string(),
        0x24 => "HOME".to_string(),
        0x23 => "END".to_string(),
        0x21 => "PAGEUP".to_string(),
        0x22 => "PAGEDOWN".to_string(),
        0x26 => "UP".to_string(),
        0x28 => "DOWN".to_string(),
        0x25 => "LEFT".to_string(),
        0x27 => "RIGHT".to_string(),
        0x14 => "CAPITAL".to_string(),
        0xBA => "OEM_1".to_string(),
        0xBB => "OEM_PLUS".to_string(),
        0xBC => "OEM_COMMA".to_string(),
        0xBD => "OEM_MINUS".to_string(),
        0xBE => "OEM_PERIOD".to_string(),
        0xBF => "OEM_2".to_string(),
        0xC0 => "OEM_3".to_string(),
        0xDB => "OEM_4".to_string(),
        0xDC => "OEM_5".to_string(),
        0xDD => "OEM_6".to_string(),
        0xDE => "OEM_7".to_string(),
        0x10 => "SHIFT".to_string(),
        0x11 => "CTRL".to_string(),
        0x12 => "ALT".to_string(),
        0xA0 => "LSHIFT".to_string(),
        0xA1 => "RSHIFT".to_string(),
        0xA2 => "LCTRL".to_string(),
        0xA3 => "RCTRL".to_string(),
        0xA4 => "LALT".to_string(),
        0xA5 => "RALT".to_string(),
        0x5B => "LWIN".to_string(),
        0x5C => "RWIN".to_string(),
        _ => format!("VK_{:02X}", vk),
    }
}

pub fn key_name_to_vk(key_name: &str) -> Option<u32> {
    let key = key_name.trim().to_uppercase();

    // letter and number keys
    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_alphabetic() || c.is_ascii_digit())
    {
        return Some(c as u32);
    }

    // F1-F24
    if key.starts_with('F')
        && key.len() > 1
        && let Ok(num) = key[1..].parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(0x70 + num - 1);
    }

    // Numpad keys
    if key.starts_with("NUMPAD")
        && key.len() > 6
        && let Ok(num) = key[6..].parse::<u32>()
        && num <= 9
    {
        return Some(0x60 + num);
    }

    match key.as_str() {
        "ESC" | "ESCAPE" => Some(0x1B),
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "SHIFT" => Some(0x10),
        "CTRL" => Some(0x11),
        "ALT" => Some(0x12),
        "CAPSLOCK" | "CAPITAL" => Some(0x14),
        "SPACE" => Some(0x20),
        "BACKSPACE" | "BACK" => Some(0x08),
        "DELETE" => Some(0x2E),
        "INSERT" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),
        "LSHIFT" => Some(0xA0),
        "RSHIFT" => Some(0xA1),
        "LCTRL" => Some(0xA2),
        "RCTRL" => Some(0xA3),
        "LALT" => Some(0xA4),
        "RALT" => Some(0xA5),
        "LWIN" => Some(0x5B),
        "RWIN" => Some(0x5C),
        "OEM_1" => Some(0xBA),
        "OEM_PLUS" => Some(0xBB),
        "OEM_COMMA" => Some(0xBC),
        "OEM_MINUS" => Some(0xBD),
        "OEM_PERIOD" => Some(0xBE),
        "OEM_2" => Some(0xBF),
        "OEM_3" => Some(0xC0),
        "OEM_4" => Some(0xDB),
        "OEM_5" => Some(0xDC),
        "OEM_6" => Some(0xDD),
        "OEM_7" => Some(0xDE),
        _ => None,
    }
}

/// Maps a modifier name to its flag. Left/right variants collapse.
pub fn modifier_name_to_flag(name: &str) -> Option<Modifiers> {
    match name.trim().to_uppercase().as_str() {
        "SHIFT" | "LSHIFT" | "RSHIFT" => Some(Modifiers::SHIFT),
        "CTRL" | "CONTROL" | "LCTRL" | "RCTRL" => Some(Modifiers::CTRL),
        "ALT" | "OPTION" | "LALT" | "RALT" => Some(Modifiers::ALT),
        "WIN" | "META" | "CMD" | "LWIN" | "RWIN" => Some(Modifiers::META),
        _ => None,
    }
}

/// Parses `"ALT+SPACE"` style names. The last part is the key, every
/// preceding part must be a modifier.
pub fn parse_hotkey(name: &str) -> Option<Hotkey> {
    let parts: Vec<&str> = name.split('+').map(str::trim).collect();
    let (key_name, modifier_names) = parts.split_last()?;
    if key_name.is_empty() {
        return None;
    }

    let mut modifiers = Modifiers::NONE;
    for part in modifier_names {
        modifiers = modifiers | modifier_name_to_flag(part)?;
    }

    key_name_to_vk(key_name).map(|key| Hotkey::new(key, modifiers))
}
