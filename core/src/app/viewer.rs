use alloc::{format, string::String, vec::Vec};
use core::fmt;

use embedded_graphics::prelude::Point;

use crate::{
    application::{Application, MARGIN, SideButton},
    display::Display,
    fs::{Filesystem, LineReader, Mode},
    input::{Clock, PollMode},
    text::word_wrap,
    ui::key,
};

/// Lines read between two touch polls.
const READ_BATCH: usize = 32;

/// Wrapped lines of a growing file and the window onto them.
///
/// While live the window follows the newest line. Paging up leaves live
/// mode; paging back down to the end re-enters it.
#[derive(Debug, Clone)]
pub struct TailView {
    lines: Vec<String>,
    top: usize,
    rows: usize,
    live: bool,
    loaded: bool,
}

impl TailView {
    pub fn new(rows: usize) -> Self {
        Self {
            lines: Vec::new(),
            top: 0,
            rows: rows.max(1),
            live: true,
            loaded: false,
        }
    }

    pub fn push_line(&mut self, line: &str, columns: usize) {
        self.lines.extend(word_wrap(line, columns));
        if self.live {
            self.top = self.max_top();
        }
    }

    pub fn scroll_up(&mut self) {
        self.live = false;
        self.top = self.top.saturating_sub(self.rows);
    }

    pub fn scroll_down(&mut self) {
        self.top = (self.top + self.rows).min(self.max_top());
        self.live = self.top == self.max_top();
    }

    pub fn visible(&self) -> &[String] {
        let end = (self.top + self.rows).min(self.lines.len());
        &self.lines[self.top.min(end)..end]
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The first full pass over the file is done.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    fn max_top(&self) -> usize {
        self.lines.len().saturating_sub(self.rows)
    }
}

impl<D: Display, C: Clock> Application<D, C> {
    /// Shows `path` and keeps reading as it grows until Cancel is pressed.
    ///
    /// Nothing is drawn until the file has been read to its end once.
    pub fn view_file<F: Filesystem>(&mut self, fs: &F, path: &str) {
        let file = match fs.open_file(path, Mode::Read) {
            Ok(file) => file,
            Err(err) => {
                log::warn!("Cannot open {}: {}", path, err);
                self.message("Error", &format!("Cannot open {}\n{}", path, err));
                return;
            }
        };
        let mut reader = LineReader::new(file);

        let top = self.title_height();
        let buttons_x = self.side_column_x(&[key::UP, key::DOWN, key::CANCEL]);
        let cell = self.text_scale(self.config.list_scale);
        let row_height = cell.height as i32 + i32::from(self.config.line_gap);
        let columns = ((buttons_x - 2 * MARGIN) / cell.width as i32).max(1) as usize;
        let rows = ((self.screen_size().height as i32 - MARGIN - top) / row_height).max(1) as usize;

        let mut view = TailView::new(rows);
        let mut regions = Vec::new();
        let mut dirty = false;
        loop {
            for _ in 0..READ_BATCH {
                match reader.read_line() {
                    Ok(Some(line)) => {
                        view.push_line(&line, columns);
                        dirty = true;
                    }
                    Ok(None) if view.is_loaded() => break,
                    Ok(None) => {
                        match reader.take_partial() {
                            Ok(Some(rest)) => view.push_line(&rest, columns),
                            Ok(None) => {}
                            Err(err) => return self.read_failed(path, &err),
                        }
                        view.mark_loaded();
                        log::debug!("Loaded {} lines from {}", view.len(), path);
                        dirty = true;
                        break;
                    }
                    Err(err) => return self.read_failed(path, &err),
                }
            }

            if view.is_loaded() && dirty {
                regions.clear();
                let y = self.begin_screen(Some(path));
                self.text_scale(self.config.list_scale);
                for (row, line) in view.visible().iter().enumerate() {
                    self.write_at(
                        Point::new(MARGIN, y + row as i32 * row_height),
                        line,
                        self.config.foreground,
                        self.config.background,
                    );
                }
                let paging = [
                    SideButton {
                        label: key::UP,
                        key: key::UP,
                        enabled: view.top() > 0,
                    },
                    SideButton {
                        label: key::DOWN,
                        key: key::DOWN,
                        enabled: !view.is_live(),
                    },
                ];
                let cancel = [SideButton {
                    label: key::CANCEL,
                    key: key::CANCEL,
                    enabled: true,
                }];
                self.side_column(buttons_x, y, &paging, &cancel, &mut regions);
                dirty = false;
            }

            let Some(event) = self
                .poller
                .poll_key(&mut self.display, &regions, 0, PollMode::NonBlocking)
            else {
                continue;
            };
            match event.key.as_str() {
                key::CANCEL => return,
                key::UP => view.scroll_up(),
                key::DOWN => view.scroll_down(),
                _ => continue,
            }
            dirty = true;
        }
    }

    fn read_failed(&mut self, path: &str, err: &dyn fmt::Display) {
        log::warn!("Cannot read {}: {}", path, err);
        self.message("Error", &format!("Cannot read {}\n{}", path, err));
    }
}
