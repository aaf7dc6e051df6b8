use alloc::{string::ToString, vec::Vec};

use embedded_graphics::prelude::Point;

use crate::{
    application::{Application, MARGIN},
    display::Display,
    input::{Clock, PollMode},
    text::word_wrap,
    ui::Region,
};

const OK: &str = "OK";
const YES: &str = "Yes";
const NO: &str = "No";

impl<D: Display, C: Clock> Application<D, C> {
    /// Modal message with a row of buttons along the bottom edge. Returns
    /// the index of the pressed button; with no labels a single OK is shown.
    pub fn dialog(&mut self, title: &str, message: &str, buttons: &[&str]) -> usize {
        let buttons = if buttons.is_empty() { &[OK][..] } else { buttons };
        let mut regions = Vec::with_capacity(buttons.len());

        let mut y = self.begin_screen(Some(title));
        let screen = self.screen_size();
        let style = self.config.button(self.config.narrow_scale);
        let button_height = self
            .display
            .button_size(1, self.config.font, self.config.narrow_scale)
            .height as i32;
        let buttons_top = screen.height as i32 - MARGIN - button_height;

        let cell = self.text_scale(self.config.list_scale);
        let row_height = cell.height as i32 + i32::from(self.config.line_gap);
        let columns = ((screen.width as i32 - 2 * MARGIN) / cell.width as i32).max(1) as usize;
        let lines = message.split('\n').flat_map(|paragraph| word_wrap(paragraph, columns));
        for line in lines {
            if y + row_height > buttons_top - MARGIN {
                break;
            }
            self.write_at(
                Point::new(MARGIN, y),
                &line,
                self.config.foreground,
                self.config.background,
            );
            y += row_height;
        }

        let mut x = MARGIN;
        for (index, label) in buttons.iter().enumerate() {
            let size = self.display.button_size(
                label.chars().count(),
                self.config.font,
                self.config.narrow_scale,
            );
            let top_left = Point::new(x, buttons_top);
            self.display.draw_button(top_left, &style, label);
            regions.push(Region::from_size(top_left, size, index.to_string()));
            x += size.width as i32 + self.config.key_gap;
        }

        loop {
            let event = self
                .poller
                .poll_key(&mut self.display, &regions, 0, PollMode::Blocking);
            if let Some(index) = event.and_then(|event| event.key.parse::<usize>().ok()) {
                return index;
            }
        }
    }

    pub fn message(&mut self, title: &str, text: &str) {
        self.dialog(title, text, &[OK]);
    }

    pub fn confirm(&mut self, title: &str, text: &str) -> bool {
        self.dialog(title, text, &[YES, NO]) == 0
    }
}
