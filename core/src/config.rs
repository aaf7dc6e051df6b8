use embedded_graphics::{
    pixelcolor::{Rgb565, WebColors},
    prelude::RgbColor,
};

use crate::display::ButtonStyle;
use crate::input::StandbyConfig;

/// Appearance and timing options shared by every entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub foreground: Rgb565,
    pub background: Rgb565,
    pub title: Rgb565,
    /// Background of the character under the text cursor.
    pub cursor: Rgb565,
    /// Cursor background once the buffer is full.
    pub warning: Rgb565,
    pub directory: Rgb565,
    pub button_face: Rgb565,
    pub button_text: Rgb565,
    pub disabled: Rgb565,
    /// Shift key face for none, shift and caps lock.
    pub shift_palette: [Rgb565; 3],

    pub font: u8,
    /// Text input scale while the text fits in half the field.
    pub wide_scale: u8,
    pub narrow_scale: u8,
    pub list_scale: u8,
    pub key_scale: u8,
    pub line_gap: u8,
    pub key_gap: i32,

    pub long_press_ms: u32,
    /// Idle time before the backlight goes off; `None` keeps it on.
    pub standby_ms: Option<u32>,
    pub backlight_pin: Option<u8>,
    pub sleep_units: u16,

    pub max_line_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
            title: Rgb565::YELLOW,
            cursor: Rgb565::WHITE,
            warning: Rgb565::RED,
            directory: Rgb565::CYAN,
            button_face: Rgb565::CSS_DARK_SLATE_GRAY,
            button_text: Rgb565::WHITE,
            disabled: Rgb565::CSS_DIM_GRAY,
            shift_palette: [
                Rgb565::CSS_DARK_SLATE_GRAY,
                Rgb565::CSS_DARK_ORANGE,
                Rgb565::CSS_DARK_RED,
            ],
            font: 2,
            wide_scale: 2,
            narrow_scale: 1,
            list_scale: 1,
            key_scale: 2,
            line_gap: 4,
            key_gap: 6,
            long_press_ms: 1000,
            standby_ms: None,
            backlight_pin: None,
            sleep_units: 0,
            max_line_len: 255,
        }
    }
}

impl Config {
    pub fn standby(&self) -> Option<StandbyConfig> {
        self.standby_ms.map(|timeout_ms| StandbyConfig {
            timeout_ms,
            backlight_pin: self.backlight_pin,
            sleep_units: self.sleep_units,
        })
    }

    pub fn button(&self, scale: u8) -> ButtonStyle {
        ButtonStyle {
            face: self.button_face,
            text: self.button_text,
            font: self.font,
            scale,
        }
    }
}
