//! UI configuration
//!
//! Screen geometry, animation speed, backlight levels and eco-mode timings.
//! The struct is serde-friendly so a firmware build can ship it as a settings
//! blob; [`UiConfig::default`] matches the T-Watch panel.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Panel width in pixels.
pub const SCREEN_WIDTH: u32 = 240;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Distance (pixels) tiles travel per frame during a page transition.
pub const UI_ANIM_DELTA: u32 = 40;

/// Backlight duty applied after boot and whenever the UI wakes up.
pub const BACKLIGHT_DEFAULT: u16 = 1000;

/// Backlight duty used while the screen is dimmed by eco mode.
pub const BACKLIGHT_DIMMED: u16 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub anim_delta: u32,
    pub backlight_default: u16,
    pub backlight_dimmed: u16,
    /// Start with eco mode armed.
    pub eco_mode: bool,
    /// Seconds without input before the backlight is dimmed.
    pub eco_max_inactivity: u32,
    /// Seconds spent dimmed before the watch goes to deep sleep.
    pub eco_max_inactivity_to_deepsleep: u32,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            anim_delta: UI_ANIM_DELTA,
            backlight_default: BACKLIGHT_DEFAULT,
            backlight_dimmed: BACKLIGHT_DIMMED,
            eco_mode: false,
            eco_max_inactivity: 10,
            eco_max_inactivity_to_deepsleep: 20,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl UiConfig {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.eco_max_inactivity as u64)
    }

    pub fn deepsleep_timeout(&self) -> Duration {
        Duration::from_secs(self.eco_max_inactivity_to_deepsleep as u64)
    }

    /// Animation step, never zero so transitions always terminate.
    pub fn anim_step(&self) -> i32 {
        self.anim_delta.max(1) as i32
    }
}
