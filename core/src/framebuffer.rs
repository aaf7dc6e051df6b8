use alloc::{vec, vec::Vec};
use core::convert::Infallible;

use embedded_graphics::{
    Drawable, Pixel,
    mono_font::{
        MonoFont, MonoTextStyleBuilder,
        ascii::{FONT_6X10, FONT_8X13, FONT_10X20},
    },
    pixelcolor::Rgb565,
    prelude::{DrawTarget, OriginDimensions, Point, Primitive, RgbColor, Size},
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::display::{ButtonStyle, Display, TouchState};

const BUTTON_PADDING: u32 = 8;
const FONTS: [&MonoFont<'static>; 3] = [&FONT_6X10, &FONT_8X13, &FONT_10X20];

pub fn font(id: u8) -> &'static MonoFont<'static> {
    FONTS[usize::from(id).min(FONTS.len() - 1)]
}

pub fn cell_size(id: u8, width_scale: u8, height_scale: u8) -> Size {
    let font = font(id);
    Size::new(
        (font.character_size.width + font.character_spacing) * u32::from(width_scale.max(1)),
        font.character_size.height * u32::from(height_scale.max(1)),
    )
}

pub fn button_size(label_len: usize, font: u8, scale: u8) -> Size {
    let cell = cell_size(font, scale, scale);
    Size::new(
        cell.width * label_len as u32 + 2 * BUTTON_PADDING,
        cell.height + 2 * BUTTON_PADDING,
    )
}

pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; (width as usize) * (height as usize)],
        }
    }

    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = color;
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }
}

/// Blows every pixel up into a `sx` by `sy` block placed relative to `origin`.
struct Scaled<'a> {
    target: &'a mut Framebuffer,
    origin: Point,
    sx: i32,
    sy: i32,
}

impl OriginDimensions for Scaled<'_> {
    fn size(&self) -> Size {
        Size::new(
            self.target.width / self.sx as u32,
            self.target.height / self.sy as u32,
        )
    }
}

impl DrawTarget for Scaled<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let x0 = self.origin.x + coord.x * self.sx;
            let y0 = self.origin.y + coord.y * self.sy;
            for dy in 0..self.sy {
                for dx in 0..self.sx {
                    self.target.set_pixel(x0 + dx, y0 + dy, color);
                }
            }
        }
        Ok(())
    }
}

/// Hardware side of a [`Canvas`]: touch controller, GPIO and power.
pub trait Panel {
    /// Samples the touch controller. `frame` is the current picture so a
    /// simulated panel can present it.
    fn touch_state(&mut self, frame: &Framebuffer) -> TouchState;
    fn touch_position(&self) -> Point;
    fn enable_touch(&mut self, _enabled: bool) {}
    fn set_pin(&mut self, _pin: u8, _high: bool) {}
    fn sleep(&mut self, _units: u16) -> u16 {
        0
    }
}

/// Pixel implementation of the display command set over a [`Framebuffer`].
pub struct Canvas<P: Panel> {
    frame: Framebuffer,
    panel: P,
    cursor: Point,
    line_start: i32,
    font: u8,
    width_scale: u8,
    height_scale: u8,
    line_gap: u8,
    foreground: Rgb565,
    background: Rgb565,
    underline: bool,
}

impl<P: Panel> Canvas<P> {
    pub fn new(panel: P, width: u32, height: u32) -> Self {
        Self {
            frame: Framebuffer::new(width, height),
            panel,
            cursor: Point::zero(),
            line_start: 0,
            font: 0,
            width_scale: 1,
            height_scale: 1,
            line_gap: 0,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
            underline: false,
        }
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: TextStyle) {
        let mut builder = MonoTextStyleBuilder::new()
            .font(font(style.font))
            .text_color(style.foreground);
        if let Some(background) = style.background {
            builder = builder.background_color(background);
        }
        if style.underline {
            builder = builder.underline();
        }
        let mut target = Scaled {
            target: &mut self.frame,
            origin,
            sx: i32::from(style.width_scale.max(1)),
            sy: i32::from(style.height_scale.max(1)),
        };
        Text::with_baseline(text, Point::zero(), builder.build(), Baseline::Top)
            .draw(&mut target)
            .ok();
    }
}

#[derive(Clone, Copy)]
struct TextStyle {
    font: u8,
    width_scale: u8,
    height_scale: u8,
    foreground: Rgb565,
    background: Option<Rgb565>,
    underline: bool,
}

impl<P: Panel> Display for Canvas<P> {
    fn max_x(&self) -> i32 {
        self.frame.width as i32 - 1
    }

    fn max_y(&self) -> i32 {
        self.frame.height as i32 - 1
    }

    fn clear(&mut self, color: Rgb565) {
        self.frame.clear(color).ok();
        self.cursor = Point::zero();
        self.line_start = 0;
    }

    fn fill_rect(&mut self, top_left: Point, bottom_right: Point, color: Rgb565) {
        Rectangle::with_corners(top_left, bottom_right)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.frame)
            .ok();
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.frame)
            .ok();
    }

    fn line(&mut self, from: Point, to: Point, color: Rgb565) {
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.frame)
            .ok();
    }

    fn draw_button(&mut self, top_left: Point, style: &ButtonStyle, label: &str) {
        let size = button_size(label.chars().count(), style.font, style.scale);
        Rectangle::new(top_left, size)
            .into_styled(PrimitiveStyle::with_fill(style.face))
            .draw(&mut self.frame)
            .ok();
        let padding = BUTTON_PADDING as i32;
        self.draw_text(
            top_left + Point::new(padding, padding),
            label,
            TextStyle {
                font: style.font,
                width_scale: style.scale,
                height_scale: style.scale,
                foreground: style.text,
                background: None,
                underline: false,
            },
        );
    }

    fn move_to(&mut self, pos: Point) {
        self.cursor = pos;
        self.line_start = pos.x;
    }

    fn set_font(&mut self, font: u8) {
        self.font = font;
    }

    fn set_width_scale(&mut self, scale: u8) {
        self.width_scale = scale.max(1);
    }

    fn set_height_scale(&mut self, scale: u8) {
        self.height_scale = scale.max(1);
    }

    fn set_line_gap(&mut self, gap: u8) {
        self.line_gap = gap;
    }

    fn set_foreground(&mut self, color: Rgb565) {
        self.foreground = color;
    }

    fn set_background(&mut self, color: Rgb565) {
        self.background = color;
    }

    fn set_underline(&mut self, on: bool) {
        self.underline = on;
    }

    fn write_str(&mut self, text: &str) {
        let cell = cell_size(self.font, self.width_scale, self.height_scale);
        let style = TextStyle {
            font: self.font,
            width_scale: self.width_scale,
            height_scale: self.height_scale,
            foreground: self.foreground,
            background: Some(self.background),
            underline: self.underline,
        };
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.cursor = Point::new(
                    self.line_start,
                    self.cursor.y + cell.height as i32 + i32::from(self.line_gap),
                );
            }
            self.draw_text(self.cursor, line, style);
            self.cursor.x += cell.width as i32 * line.chars().count() as i32;
        }
    }

    fn char_width(&self) -> i32 {
        cell_size(self.font, self.width_scale, self.height_scale).width as i32
    }

    fn char_height(&self) -> i32 {
        cell_size(self.font, self.width_scale, self.height_scale).height as i32
    }

    fn button_size(&self, label_len: usize, font: u8, scale: u8) -> Size {
        button_size(label_len, font, scale)
    }

    fn enable_touch(&mut self, enabled: bool) {
        self.panel.enable_touch(enabled);
    }

    fn touch_state(&mut self) -> TouchState {
        self.panel.touch_state(&self.frame)
    }

    fn touch_x(&mut self) -> i32 {
        self.panel.touch_position().x
    }

    fn touch_y(&mut self) -> i32 {
        self.panel.touch_position().y
    }

    fn set_pin(&mut self, pin: u8, high: bool) {
        self.panel.set_pin(pin, high);
    }

    fn sleep(&mut self, units: u16) -> u16 {
        self.panel.sleep(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTouch;

    impl Panel for NoTouch {
        fn touch_state(&mut self, _frame: &Framebuffer) -> TouchState {
            TouchState::Idle
        }

        fn touch_position(&self) -> Point {
            Point::zero()
        }
    }

    #[test]
    fn cell_size_follows_scale() {
        assert_eq!(cell_size(2, 1, 1), Size::new(10, 20));
        assert_eq!(cell_size(2, 2, 3), Size::new(20, 60));
        // unknown ids fall back to the largest font
        assert_eq!(cell_size(9, 1, 1), Size::new(10, 20));
    }

    #[test]
    fn metrics_track_text_state() {
        let mut canvas = Canvas::new(NoTouch, 100, 50);
        canvas.set_font(1);
        canvas.set_width_scale(2);
        canvas.set_height_scale(3);
        assert_eq!(canvas.char_width(), 16);
        assert_eq!(canvas.char_height(), 39);
        assert_eq!(canvas.max_x(), 99);
        assert_eq!(canvas.max_y(), 49);
    }

    #[test]
    fn write_str_paints_background_and_advances() {
        let mut canvas = Canvas::new(NoTouch, 100, 50);
        canvas.set_font(0);
        canvas.set_background(Rgb565::BLUE);
        canvas.move_to(Point::new(10, 10));
        canvas.write_str("  ");
        assert_eq!(canvas.frame().pixel(10, 10), Some(Rgb565::BLUE));
        assert_eq!(canvas.frame().pixel(21, 19), Some(Rgb565::BLUE));
        assert_eq!(canvas.frame().pixel(22, 10), Some(Rgb565::BLACK));
    }

    #[test]
    fn scaled_text_covers_scaled_cells() {
        let mut canvas = Canvas::new(NoTouch, 100, 50);
        canvas.set_font(0);
        canvas.set_width_scale(2);
        canvas.set_height_scale(2);
        canvas.set_background(Rgb565::RED);
        canvas.move_to(Point::zero());
        canvas.write_str(" ");
        assert_eq!(canvas.frame().pixel(11, 19), Some(Rgb565::RED));
        assert_eq!(canvas.frame().pixel(12, 0), Some(Rgb565::BLACK));
    }

    #[test]
    fn button_fills_its_reported_size() {
        let mut canvas = Canvas::new(NoTouch, 200, 100);
        let style = ButtonStyle {
            face: Rgb565::GREEN,
            text: Rgb565::WHITE,
            font: 0,
            scale: 1,
        };
        canvas.draw_button(Point::new(5, 5), &style, "OK");
        let size = canvas.button_size(2, 0, 1);
        assert_eq!(size, Size::new(28, 26));
        assert_eq!(canvas.frame().pixel(5, 5), Some(Rgb565::GREEN));
        assert_eq!(canvas.frame().pixel(32, 30), Some(Rgb565::GREEN));
        assert_eq!(canvas.frame().pixel(33, 31), Some(Rgb565::BLACK));
    }

    #[test]
    fn fill_rect_is_inclusive() {
        let mut canvas = Canvas::new(NoTouch, 20, 20);
        canvas.fill_rect(Point::new(2, 2), Point::new(4, 4), Rgb565::WHITE);
        assert_eq!(canvas.frame().pixel(4, 4), Some(Rgb565::WHITE));
        assert_eq!(canvas.frame().pixel(5, 4), Some(Rgb565::BLACK));
    }
}
