use alloc::vec::Vec;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{Point, Size},
};

use crate::{
    config::Config,
    display::Display,
    input::{Clock, TouchPoller},
    text::cut,
    ui::Region,
};

pub(crate) const MARGIN: i32 = 8;

/// One running toolkit session: the display, its touch poller and the
/// configuration every entry point draws with.
///
/// The widgets (`input`, `listbox`, `dialog`) and the file flows
/// (`browse_file`, `view_file`, `edit_file`) are methods on this type.
pub struct Application<D: Display, C: Clock> {
    pub(crate) display: D,
    pub(crate) poller: TouchPoller<C>,
    pub(crate) config: Config,
}

pub(crate) struct SideButton<'a> {
    pub label: &'a str,
    pub key: &'a str,
    pub enabled: bool,
}

impl<D: Display, C: Clock> Application<D, C> {
    pub fn new(mut display: D, clock: C, config: Config) -> Self {
        display.enable_touch(true);
        let poller = TouchPoller::new(clock).with_standby(config.standby());
        Self {
            display,
            poller,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub(crate) fn screen_size(&self) -> Size {
        Size::new(
            (self.display.max_x() + 1).max(0) as u32,
            (self.display.max_y() + 1).max(0) as u32,
        )
    }

    /// Selects the configured font at `scale` and returns its cell size.
    pub(crate) fn text_scale(&mut self, scale: u8) -> Size {
        self.display.set_font(self.config.font);
        self.display.set_width_scale(scale);
        self.display.set_height_scale(scale);
        self.display.set_line_gap(self.config.line_gap);
        Size::new(
            self.display.char_width().max(1) as u32,
            self.display.char_height().max(1) as u32,
        )
    }

    pub(crate) fn row_height(&mut self, scale: u8) -> i32 {
        self.text_scale(scale).height as i32 + i32::from(self.config.line_gap)
    }

    pub(crate) fn write_at(
        &mut self,
        pos: Point,
        text: &str,
        foreground: Rgb565,
        background: Rgb565,
    ) {
        self.display.set_foreground(foreground);
        self.display.set_background(background);
        self.display.set_underline(false);
        self.display.move_to(pos);
        self.display.write_str(text);
    }

    pub(crate) fn title_height(&mut self) -> i32 {
        MARGIN + self.row_height(self.config.list_scale) + MARGIN
    }

    /// Clears the screen and draws the title. Returns the first free y.
    pub(crate) fn begin_screen(&mut self, title: Option<&str>) -> i32 {
        self.display.clear(self.config.background);
        let Some(title) = title else {
            return MARGIN;
        };
        let top = self.title_height();
        let cell = self.text_scale(self.config.list_scale);
        let columns = (self.screen_size().width as i32 - 2 * MARGIN) / cell.width as i32;
        let title = cut(title, columns.max(1) as usize);
        self.write_at(
            Point::new(MARGIN, MARGIN),
            &title,
            self.config.title,
            self.config.background,
        );
        top
    }

    fn side_button_size(&self, label: &str) -> Size {
        self.display
            .button_size(label.chars().count(), self.config.font, self.config.narrow_scale)
    }

    /// Left edge of the button column on the right of the screen.
    pub(crate) fn side_column_x(&self, labels: &[&str]) -> i32 {
        let width = labels
            .iter()
            .map(|label| self.side_button_size(label).width as i32)
            .max()
            .unwrap_or(0);
        self.screen_size().width as i32 - MARGIN - width
    }

    /// Draws `top` buttons downwards from `y` and `bottom` buttons upwards
    /// from the bottom edge, all in the column at `x`. Disabled buttons are
    /// greyed out and get no touch region.
    pub(crate) fn side_column(
        &mut self,
        x: i32,
        y: i32,
        top: &[SideButton<'_>],
        bottom: &[SideButton<'_>],
        regions: &mut Vec<Region>,
    ) {
        let mut y = y;
        for button in top {
            let size = self.side_button(Point::new(x, y), button, regions);
            y += size.height as i32 + self.config.key_gap;
        }
        let mut y = self.screen_size().height as i32 - MARGIN;
        for button in bottom.iter().rev() {
            y -= self.side_button_size(button.label).height as i32;
            self.side_button(Point::new(x, y), button, regions);
            y -= self.config.key_gap;
        }
    }

    fn side_button(
        &mut self,
        top_left: Point,
        button: &SideButton<'_>,
        regions: &mut Vec<Region>,
    ) -> Size {
        let mut style = self.config.button(self.config.narrow_scale);
        if !button.enabled {
            style.face = self.config.disabled;
        }
        self.display.draw_button(top_left, &style, button.label);
        let size = self.side_button_size(button.label);
        if button.enabled {
            regions.push(Region::from_size(top_left, size, button.key));
        }
        size
    }
}
