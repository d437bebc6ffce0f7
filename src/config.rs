use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{InterceptError, Result};
use crate::state::parsing::{key_name_to_vk, parse_hotkey};
use crate::state::{Bindings, Direction, KeyRole, MouseButton};

/// Environment variable holding inline TOML overrides.
pub const CONFIG_ENV_VAR: &str = "KEYMOUSE_CONFIG";

/// Upper bound for lines per scroll key press.
pub const MAX_SCROLL_LINES: i32 = 100;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub acceleration: AccelerationConfig,
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
    #[serde(default)]
    pub bindings: BindingsConfig,
}

/// Cursor acceleration tunables. Speeds are in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AccelerationConfig {
    #[serde(default = "default_start_speed")]
    pub start_speed: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Seconds to ramp from `start_speed` to `max_speed` once past the deadzone.
    #[serde(default = "default_ramp_time")]
    pub ramp_time: f32,
    /// Seconds a direction must be held before the cursor starts moving.
    #[serde(default = "default_deadzone_time")]
    pub deadzone_time: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BindingsConfig {
    #[serde(default = "default_toggle")]
    pub toggle: String,
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_up")]
    pub up: String,
    #[serde(default = "default_down")]
    pub down: String,
    #[serde(default = "default_left")]
    pub left: String,
    #[serde(default = "default_right")]
    pub right: String,
    #[serde(default = "default_left_click")]
    pub left_click: String,
    #[serde(default = "default_right_click")]
    pub right_click: String,
    #[serde(default = "default_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: i32,
}

fn default_tick_rate_hz() -> u32 {
    60
}
fn default_start_speed() -> f32 {
    20.0
}
fn default_max_speed() -> f32 {
    1200.0
}
fn default_ramp_time() -> f32 {
    0.7
}
fn default_deadzone_time() -> f32 {
    0.05
}
fn default_toggle() -> String {
    "ALT+SPACE".to_string()
}
fn default_quit() -> String {
    "ALT+ESC".to_string()
}
fn default_up() -> String {
    "I".to_string()
}
fn default_down() -> String {
    "K".to_string()
}
fn default_left() -> String {
    "J".to_string()
}
fn default_right() -> String {
    "L".to_string()
}
fn default_left_click() -> String {
    "Q".to_string()
}
fn default_right_click() -> String {
    "E".to_string()
}
fn default_scroll_up() -> String {
    "W".to_string()
}
fn default_scroll_down() -> String {
    "S".to_string()
}
fn default_scroll_lines() -> i32 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            acceleration: AccelerationConfig::default(),
            tick_rate_hz: default_tick_rate_hz(),
            bindings: BindingsConfig::default(),
        }
    }
}

impl Default for AccelerationConfig {
    fn default() -> Self {
        Self {
            start_speed: default_start_speed(),
            max_speed: default_max_speed(),
            ramp_time: default_ramp_time(),
            deadzone_time: default_deadzone_time(),
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle(),
            quit: default_quit(),
            up: default_up(),
            down: default_down(),
            left: default_left(),
            right: default_right(),
            left_click: default_left_click(),
            right_click: default_right_click(),
            scroll_up: default_scroll_up(),
            scroll_down: default_scroll_down(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by inline TOML from [`CONFIG_ENV_VAR`] when set.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(content) if !content.trim().is_empty() => Self::from_toml_str(&content),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| InterceptError::InvalidConfig(e.to_string()))?;
        Ok(config.validated())
    }

    /// Clamps tunables into their usable ranges. Non-finite values fall back
    /// to their defaults.
    pub fn validated(mut self) -> Self {
        let accel = &mut self.acceleration;
        if !accel.start_speed.is_finite() {
            accel.start_speed = default_start_speed();
        }
        if !accel.max_speed.is_finite() {
            accel.max_speed = default_max_speed();
        }
        if !accel.ramp_time.is_finite() {
            accel.ramp_time = default_ramp_time();
        }
        if !accel.deadzone_time.is_finite() {
            accel.deadzone_time = default_deadzone_time();
        }

        accel.start_speed = accel.start_speed.max(0.0);
        accel.max_speed = accel.max_speed.max(accel.start_speed);
        accel.ramp_time = accel.ramp_time.max(0.001);
        accel.deadzone_time = accel.deadzone_time.max(0.0);

        self.tick_rate_hz = self.tick_rate_hz.clamp(1, 1000);
        self.bindings.scroll_lines = self.bindings.scroll_lines.clamp(1, MAX_SCROLL_LINES);

        self
    }

    /// Tick period for the motion loop, rounded to the nearest nanosecond.
    pub fn tick_period(&self) -> Duration {
        let hz = u64::from(self.tick_rate_hz.max(1));
        Duration::from_nanos((1_000_000_000 + hz / 2) / hz)
    }
}

impl BindingsConfig {
    /// Resolves key names into a [`Bindings`] layout.
    pub fn resolve(&self) -> Result<Bindings> {
        let toggle = parse_hotkey(&self.toggle)
            .ok_or_else(|| InterceptError::InvalidBinding(format!("toggle: {}", self.toggle)))?;
        let quit = parse_hotkey(&self.quit)
            .ok_or_else(|| InterceptError::InvalidBinding(format!("quit: {}", self.quit)))?;
        if toggle == quit {
            return Err(InterceptError::InvalidBinding(format!(
                "toggle and quit share {}",
                toggle
            )));
        }

        let lines = self.scroll_lines.clamp(1, MAX_SCROLL_LINES);
        let layout = [
            (&self.up, KeyRole::Move(Direction::Up)),
            (&self.down, KeyRole::Move(Direction::Down)),
            (&self.left, KeyRole::Move(Direction::Left)),
            (&self.right, KeyRole::Move(Direction::Right)),
            (&self.left_click, KeyRole::Click(MouseButton::Left)),
            (&self.right_click, KeyRole::Click(MouseButton::Right)),
            (&self.scroll_up, KeyRole::Scroll(lines)),
            (&self.scroll_down, KeyRole::Scroll(-lines)),
        ];

        let mut bindings = Bindings::new(toggle, quit);
        for (name, role) in layout {
            let code = key_name_to_vk(name)
                .ok_or_else(|| InterceptError::InvalidBinding(format!("unknown key: {}", name)))?;
            bindings.bind(code, role)?;
        }

        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Hotkey, Modifiers};
    use crate::state::parsing::vk;

    #[test]
    fn test_default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.acceleration.start_speed, 20.0);
        assert_eq!(config.acceleration.max_speed, 1200.0);
        assert_eq!(config.acceleration.ramp_time, 0.7);
        assert_eq!(config.acceleration.deadzone_time, 0.05);
        assert_eq!(config.bindings.scroll_lines, 3);
    }

    #[test]
    fn test_default_tick_period_is_60hz() {
        let config = AppConfig::default();
        assert_eq!(config.tick_period(), Duration::from_nanos(16_666_667));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.acceleration, AccelerationConfig::default());
        assert_eq!(config.bindings.toggle, "ALT+SPACE");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            tick_rate_hz = 120

            [acceleration]
            max_speed = 1000.0

            [bindings]
            up = "UP"
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate_hz, 120);
        assert_eq!(config.acceleration.max_speed, 1000.0);
        assert_eq!(config.acceleration.start_speed, 20.0);
        assert_eq!(config.bindings.up, "UP");
        assert_eq!(config.bindings.down, "K");
    }

    #[test]
    fn test_malformed_toml_is_invalid_config() {
        let err = AppConfig::from_toml_str("tick_rate_hz = \"fast\"").unwrap_err();
        assert!(matches!(err, InterceptError::InvalidConfig(_)));
    }

    #[test]
    fn test_validation_clamps_out_of_range_values() {
        let config = AppConfig::from_toml_str(
            r#"
            tick_rate_hz = 0

            [acceleration]
            start_speed = 500.0
            max_speed = 100.0
            ramp_time = 0.0
            deadzone_time = -1.0

            [bindings]
            scroll_lines = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate_hz, 1);
        assert_eq!(config.acceleration.max_speed, 500.0);
        assert_eq!(config.acceleration.ramp_time, 0.001);
        assert_eq!(config.acceleration.deadzone_time, 0.0);
        assert_eq!(config.bindings.scroll_lines, 1);
    }

    #[test]
    fn test_non_finite_tunables_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [acceleration]
            start_speed = inf
            max_speed = inf
            ramp_time = nan
            deadzone_time = -inf
            "#,
        )
        .unwrap();

        assert_eq!(config.acceleration, AccelerationConfig::default());
    }

    #[test]
    fn test_infinite_speed_cannot_jump_cursor_to_corner() {
        use crate::motion::{InputState, MotionModel, ScreenBounds};
        use crate::vector::Vec2;

        let config = AppConfig::from_toml_str(
            r#"
            [acceleration]
            start_speed = inf
            max_speed = inf
            deadzone_time = 0.0
            "#,
        )
        .unwrap();
        let mut model = MotionModel::new(config.acceleration, ScreenBounds::new(1920.0, 1080.0));
        let input = InputState {
            right: true,
            ..InputState::default()
        };

        let next = model
            .step(&input, Vec2::new(500.0, 500.0), 1.0 / 60.0)
            .unwrap();
        assert!(next.x > 500.0 && next.x < 600.0);
        assert_eq!(next.y, 500.0);
    }

    #[test]
    fn test_scroll_lines_are_capped() {
        let config = AppConfig::from_toml_str("[bindings]\nscroll_lines = 2147483647").unwrap();
        assert_eq!(config.bindings.scroll_lines, MAX_SCROLL_LINES);

        let resolved = config.bindings.resolve().unwrap();
        assert_eq!(resolved.role(vk::W), Some(KeyRole::Scroll(MAX_SCROLL_LINES)));
        assert_eq!(resolved.role(vk::S), Some(KeyRole::Scroll(-MAX_SCROLL_LINES)));
    }

    #[test]
    fn test_default_bindings_resolve_to_default_layout() {
        let resolved = BindingsConfig::default().resolve().unwrap();
        assert_eq!(resolved, Bindings::default());
        assert_eq!(resolved.toggle, Hotkey::new(vk::SPACE, Modifiers::ALT));
        assert_eq!(resolved.role(vk::W), Some(KeyRole::Scroll(3)));
        assert_eq!(resolved.role(vk::S), Some(KeyRole::Scroll(-3)));
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let bindings = BindingsConfig {
            left_click: "I".to_string(),
            ..BindingsConfig::default()
        };
        let err = bindings.resolve().unwrap_err();
        assert!(matches!(err, InterceptError::InvalidBinding(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let bindings = BindingsConfig {
            toggle: "HYPER+SPACE".to_string(),
            ..BindingsConfig::default()
        };
        assert!(matches!(
            bindings.resolve(),
            Err(InterceptError::InvalidBinding(_))
        ));
    }

    #[test]
    fn test_toggle_and_quit_must_differ() {
        let bindings = BindingsConfig {
            quit: "ALT+SPACE".to_string(),
            ..BindingsConfig::default()
        };
        assert!(bindings.resolve().is_err());
    }
}
