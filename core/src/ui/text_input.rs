use alloc::{string::String, vec::Vec};

use embedded_graphics::prelude::Point;

use crate::{
    application::{Application, MARGIN},
    display::Display,
    input::{Clock, PollMode},
    keyboard::{KeyAction, Keyboard},
    ui::{Region, key},
};

/// Taps this close to either edge of the window re-centre it on the cursor.
const RECENTER_MARGIN: usize = 10;
const MASK: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub inverted: bool,
    pub warning: bool,
    pub underline: bool,
}

/// Run of visible characters sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

/// Editing state of a single-line text field.
///
/// `cursor` is 1-based and may sit one past the last character. The
/// window shows `window` characters starting after `scroll`; every edit
/// leaves the cursor inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    buffer: Vec<char>,
    cursor: usize,
    scroll: usize,
    window: usize,
    max_len: usize,
    password: bool,
    untouched_default: bool,
}

impl TextInput {
    pub fn new(default_text: &str, max_len: usize, password: bool) -> Self {
        let mut buffer: Vec<char> = default_text.chars().collect();
        buffer.truncate(max_len);
        let cursor = buffer.len() + 1;
        Self {
            untouched_default: password && !buffer.is_empty(),
            buffer,
            cursor,
            scroll: 0,
            window: max_len.saturating_add(1),
            max_len,
            password,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.max_len
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// True while a password default is shown and nothing has been typed.
    pub fn shows_default(&self) -> bool {
        self.untouched_default
    }

    pub fn set_window(&mut self, window: usize) {
        self.window = window.max(1);
        if self.cursor <= self.scroll {
            self.scroll = self.cursor - 1;
        } else if self.cursor > self.scroll.saturating_add(self.window) {
            self.scroll = self.cursor - self.window;
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.untouched_default {
            self.buffer.clear();
            self.cursor = 1;
            self.scroll = 0;
            self.untouched_default = false;
        }
        if self.buffer.len() >= self.max_len {
            return;
        }
        self.buffer.insert(self.cursor - 1, ch);
        self.cursor += 1;
        if self.cursor > self.scroll.saturating_add(self.window) {
            self.scroll += 1;
        }
    }

    /// Deletes the character left of the cursor, or everything left of it
    /// when `clear_left` is set or an untouched password default is shown.
    pub fn backspace(&mut self, clear_left: bool) {
        if clear_left || self.untouched_default {
            self.buffer.drain(..self.cursor - 1);
            self.cursor = 1;
            self.scroll = 0;
            self.untouched_default = false;
            return;
        }
        if self.cursor == 1 {
            return;
        }
        self.buffer.remove(self.cursor - 2);
        self.cursor -= 1;
        let past_end = self.scroll.saturating_add(self.window) > self.buffer.len() + 1;
        if self.scroll > 0 && (past_end || self.cursor <= self.scroll + 1) {
            self.scroll -= 1;
        }
    }

    /// Moves the cursor to the character under a tap `x` pixels from the
    /// left edge of the field. Ignored for passwords.
    pub fn move_cursor_from_tap(&mut self, x: i32, char_width: i32) {
        if self.password || char_width <= 0 {
            return;
        }
        let column = ((x.max(0) / char_width) as usize).min(self.window - 1);
        self.cursor = (self.scroll + column + 1).clamp(1, self.buffer.len() + 1);
        let from_left = self.cursor.saturating_sub(self.scroll);
        let from_right = self.scroll.saturating_add(self.window).saturating_sub(self.cursor);
        if from_left <= RECENTER_MARGIN || from_right < RECENTER_MARGIN {
            self.scroll = (self.cursor - 1).saturating_sub(self.window / 2);
        }
        let max_scroll = (self.buffer.len() + 1).saturating_sub(self.window);
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Styled runs for the visible window. The column after the last
    /// character is the end-of-text cursor cell.
    pub fn spans(&self) -> Vec<Span> {
        let len = self.buffer.len();
        let end = self.scroll.saturating_add(self.window).min(len + 1);
        let more_right = len + 1 > self.scroll.saturating_add(self.window);
        let mut spans: Vec<Span> = Vec::new();
        for index in self.scroll..end {
            let under_cursor = index + 1 == self.cursor;
            let mut ch = self.buffer.get(index).copied().unwrap_or(' ');
            if self.password && index < len && (self.untouched_default || !under_cursor) {
                ch = MASK;
            }
            let style = SpanStyle {
                inverted: under_cursor || self.untouched_default,
                warning: under_cursor && self.is_full(),
                underline: (index == self.scroll && self.scroll > 0)
                    || (index + 1 == end && more_right),
            };
            match spans.last_mut() {
                Some(span) if span.style == style => span.text.push(ch),
                _ => spans.push(Span {
                    text: String::from(ch),
                    style,
                }),
            }
        }
        spans
    }
}

#[derive(Debug, Clone)]
pub struct InputRequest<'a> {
    pub prompt: &'a str,
    pub default_text: &'a str,
    pub layout: &'a str,
    pub max_len: usize,
    pub password: bool,
    /// Fixed text scale; by default the field picks wide or narrow.
    pub scale: Option<u8>,
}

impl<'a> InputRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            default_text: "",
            layout: "Normal",
            max_len: 255,
            password: false,
            scale: None,
        }
    }

    pub fn default_text(mut self, text: &'a str) -> Self {
        self.default_text = text;
        self
    }

    pub fn layout(mut self, layout: &'a str) -> Self {
        self.layout = layout;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputResult {
    pub text: String,
    /// Cursor position when Done was pressed with shift active.
    pub split_at: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl<D: Display, C: Clock> Application<D, C> {
    pub fn input(
        &mut self,
        prompt: &str,
        default_text: &str,
        layout: &str,
        max_len: usize,
    ) -> Option<InputResult> {
        self.input_with(
            &InputRequest::new(prompt)
                .default_text(default_text)
                .layout(layout)
                .max_len(max_len),
        )
    }

    /// Edits a line of text on the on-screen keyboard. `None` on Cancel.
    pub fn input_with(&mut self, request: &InputRequest<'_>) -> Option<InputResult> {
        let mut engine = TextInput::new(request.default_text, request.max_len, request.password);
        let mut keyboard = Keyboard::new(request.layout);
        let mut regions = Vec::new();
        let mut repaint = true;
        let field = self.input_field(request.scale);
        loop {
            if repaint {
                regions.clear();
                self.display.clear(self.config.background);
                keyboard.draw(&mut self.display, &self.config, &mut regions);
                self.text_scale(self.config.narrow_scale);
                self.write_at(
                    Point::new(MARGIN, MARGIN),
                    request.prompt,
                    self.config.title,
                    self.config.background,
                );
                regions.push(Region::new(
                    field.left,
                    field.top,
                    field.left + field.width - 1,
                    field.top + field.height - 1,
                    key::IN_WINDOW,
                ));
                repaint = false;
            }
            let char_width = self.draw_field(&mut engine, &field, request.scale);
            let Some(event) =
                self.poller
                    .poll_key(&mut self.display, &regions, 0, PollMode::Blocking)
            else {
                continue;
            };
            if event.key == key::IN_WINDOW {
                engine.move_cursor_from_tap(event.x - field.left, char_width);
                continue;
            }
            match keyboard.handle(&event.key) {
                KeyAction::Insert(text) => text.chars().for_each(|ch| engine.insert_char(ch)),
                KeyAction::Backspace { clear_left } => engine.backspace(clear_left),
                KeyAction::Done { split } => {
                    return Some(InputResult {
                        text: engine.text(),
                        split_at: split.then_some(engine.cursor()),
                    });
                }
                KeyAction::Cancel => return None,
                KeyAction::LayoutChanged => repaint = true,
                KeyAction::ShiftChanged | KeyAction::Ignored => {}
            }
            if !repaint {
                keyboard.draw_shift(&mut self.display, &self.config);
            }
        }
    }

    pub(crate) fn input_field(&mut self, scale: Option<u8>) -> FieldGeometry {
        let prompt_height = self.row_height(self.config.narrow_scale);
        let tallest = scale.unwrap_or(self.config.wide_scale.max(self.config.narrow_scale));
        let height = self.text_scale(tallest).height as i32;
        FieldGeometry {
            left: MARGIN,
            top: MARGIN + prompt_height + MARGIN,
            width: self.screen_size().width as i32 - 2 * MARGIN,
            height,
        }
    }

    /// Paints the visible window of `engine`; returns the character width
    /// used so taps can be mapped back to columns.
    fn draw_field(
        &mut self,
        engine: &mut TextInput,
        field: &FieldGeometry,
        scale: Option<u8>,
    ) -> i32 {
        let scale = scale.unwrap_or_else(|| {
            let wide = self.text_scale(self.config.wide_scale).width as i32;
            if (engine.len() as i32 + 1) * wide <= field.width / 2 {
                self.config.wide_scale
            } else {
                self.config.narrow_scale
            }
        });
        let char_width = self.text_scale(scale).width as i32;
        engine.set_window((field.width / char_width).max(1) as usize);

        self.display.fill_rect(
            Point::new(field.left, field.top),
            Point::new(field.left + field.width - 1, field.top + field.height - 1),
            self.config.background,
        );
        let mut x = field.left;
        for span in engine.spans() {
            let (foreground, background) = if span.style.inverted {
                let background = if span.style.warning {
                    self.config.warning
                } else {
                    self.config.cursor
                };
                (self.config.background, background)
            } else {
                (self.config.foreground, self.config.background)
            };
            self.display.set_foreground(foreground);
            self.display.set_background(background);
            self.display.set_underline(span.style.underline);
            self.display.move_to(Point::new(x, field.top));
            self.display.write_str(&span.text);
            x += span.text.chars().count() as i32 * char_width;
        }
        self.display.set_underline(false);
        char_width
    }
}
