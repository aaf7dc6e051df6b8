use std::time::Duration;

use embedded_graphics::{
    pixelcolor::{Rgb565, Rgb888},
    prelude::{Point, RgbColor},
};
use touchkit_core::{
    display::{HEIGHT, TouchState, WIDTH},
    framebuffer::{Framebuffer, Panel},
};

/// Output pin wired to the simulated backlight.
pub const BACKLIGHT_PIN: u8 = 0;

/// Touch panel simulated with a minifb window; the left mouse button is
/// the finger.
pub struct MinifbPanel {
    window: minifb::Window,
    buffer: Vec<u32>,
    was_down: bool,
    position: Point,
    backlight: bool,
}

impl MinifbPanel {
    pub fn new(window: minifb::Window) -> Self {
        Self {
            window,
            buffer: vec![0; WIDTH * HEIGHT],
            was_down: false,
            position: Point::zero(),
            backlight: true,
        }
    }

    fn present(&mut self, frame: &Framebuffer) {
        for (dst, pixel) in self.buffer.iter_mut().zip(frame.pixels()) {
            *dst = if self.backlight { argb(*pixel) } else { 0xFF00_0000 };
        }
        if let Err(err) = self.window.update_with_buffer(&self.buffer, WIDTH, HEIGHT) {
            log::error!("Unable to update window: {}", err);
        }
    }
}

fn argb(color: Rgb565) -> u32 {
    let color = Rgb888::from(color);
    0xFF00_0000 | u32::from(color.r()) << 16 | u32::from(color.g()) << 8 | u32::from(color.b())
}

impl Panel for MinifbPanel {
    fn touch_state(&mut self, frame: &Framebuffer) -> TouchState {
        self.present(frame);
        if !self.window.is_open() || self.window.is_key_down(minifb::Key::Escape) {
            log::info!("Window closed");
            std::process::exit(0);
        }

        let down = self.window.get_mouse_down(minifb::MouseButton::Left);
        if let Some((x, y)) = self.window.get_mouse_pos(minifb::MouseMode::Clamp) {
            self.position = Point::new(x as i32, y as i32);
        }
        let state = match (self.was_down, down) {
            (false, true) => TouchState::Down,
            (true, true) => TouchState::Moving,
            (true, false) => TouchState::Up,
            (false, false) => TouchState::Idle,
        };
        self.was_down = down;
        state
    }

    fn touch_position(&self) -> Point {
        self.position
    }

    fn set_pin(&mut self, pin: u8, high: bool) {
        if pin == BACKLIGHT_PIN {
            log::debug!("Backlight {}", if high { "on" } else { "off" });
            self.backlight = high;
        }
    }

    /// Units are milliseconds on the desktop.
    fn sleep(&mut self, units: u16) -> u16 {
        std::thread::sleep(Duration::from_millis(u64::from(units)));
        0
    }
}
