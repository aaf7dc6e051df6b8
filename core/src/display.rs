use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{Point, Size},
};

pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 480;

/// Touch controller status as reported by the display module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    Idle,
    Down,
    Moving,
    Up,
}

impl TouchState {
    pub fn is_held(self) -> bool {
        matches!(self, TouchState::Down | TouchState::Moving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStyle {
    pub face: Rgb565,
    pub text: Rgb565,
    pub font: u8,
    pub scale: u8,
}

/// Command set of the attached display module.
///
/// Text output is stateful: font, scales, colours and underline stay in
/// effect until changed, and `write_str` draws at the position set by
/// `move_to`. Coordinates are screen pixels with the origin top-left.
pub trait Display {
    fn max_x(&self) -> i32;
    fn max_y(&self) -> i32;

    fn clear(&mut self, color: Rgb565);
    /// Fills the rectangle spanning both corners, inclusive.
    fn fill_rect(&mut self, top_left: Point, bottom_right: Point, color: Rgb565);
    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565);
    fn line(&mut self, from: Point, to: Point, color: Rgb565);
    fn draw_button(&mut self, top_left: Point, style: &ButtonStyle, label: &str);

    fn move_to(&mut self, pos: Point);
    fn set_font(&mut self, font: u8);
    fn set_width_scale(&mut self, scale: u8);
    fn set_height_scale(&mut self, scale: u8);
    fn set_line_gap(&mut self, gap: u8);
    fn set_foreground(&mut self, color: Rgb565);
    fn set_background(&mut self, color: Rgb565);
    fn set_underline(&mut self, on: bool);
    fn write_str(&mut self, text: &str);

    /// Cell width of the current font at the current width scale.
    fn char_width(&self) -> i32;
    /// Cell height of the current font at the current height scale.
    fn char_height(&self) -> i32;
    fn button_size(&self, label_len: usize, font: u8, scale: u8) -> Size;

    fn enable_touch(&mut self, enabled: bool);
    fn touch_state(&mut self) -> TouchState;
    fn touch_x(&mut self) -> i32;
    fn touch_y(&mut self) -> i32;

    fn set_pin(&mut self, pin: u8, high: bool);
    /// Low power sleep; returns the units left if woken early.
    fn sleep(&mut self, units: u16) -> u16;
}
