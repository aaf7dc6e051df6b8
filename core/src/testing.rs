//! Test doubles for the display, clock and filesystem collaborators.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{Point, RgbColor, Size},
};
use embedded_io::{ErrorKind, ErrorType, Read, Write};

use crate::display::{ButtonStyle, Display, TouchState};
use crate::fs::{File, Filesystem, Mode};
use crate::input::Clock;

#[derive(Debug, Clone, Copy)]
struct Sample {
    state: TouchState,
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub pos: Point,
    pub text: String,
    pub foreground: Rgb565,
    pub background: Rgb565,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRecord {
    pub top_left: Point,
    pub label: String,
    pub face: Rgb565,
}

/// Display double with a scripted touch controller.
///
/// Cells are 8x16 pixels per scale step and buttons add 8 pixels of
/// padding on each side. Reading the touch state past the end of the
/// script panics, so a widget waiting for input cannot hang a test.
pub struct MockDisplay {
    script: VecDeque<Sample>,
    last: Sample,
    cursor: Point,
    width_scale: u8,
    height_scale: u8,
    foreground: Rgb565,
    background: Rgb565,
    underline: bool,
    pub writes: Vec<TextRecord>,
    pub buttons: Vec<ButtonRecord>,
    pub clears: usize,
    pub pins: Vec<(u8, bool)>,
    pub sleeps: Vec<u16>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            last: Sample {
                state: TouchState::Idle,
                x: 0,
                y: 0,
            },
            cursor: Point::zero(),
            width_scale: 1,
            height_scale: 1,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
            underline: false,
            writes: Vec::new(),
            buttons: Vec::new(),
            clears: 0,
            pins: Vec::new(),
            sleeps: Vec::new(),
        }
    }

    fn push(&mut self, state: TouchState, x: i32, y: i32) {
        self.script.push_back(Sample { state, x, y });
    }

    pub fn idle(&mut self, samples: usize) {
        for _ in 0..samples {
            self.push(TouchState::Idle, 0, 0);
        }
    }

    /// Touch down only; the release is never reported.
    pub fn tap(&mut self, x: i32, y: i32) {
        self.push(TouchState::Down, x, y);
    }

    pub fn tap_at(&mut self, point: Point) {
        self.tap(point.x, point.y);
    }

    /// Touch down, `held` samples of contact, then release.
    pub fn hold(&mut self, x: i32, y: i32, held: usize) {
        self.push(TouchState::Down, x, y);
        for _ in 0..held {
            self.push(TouchState::Moving, x, y);
        }
        self.push(TouchState::Up, x, y);
    }

    pub fn script_is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn written_text(&self) -> Vec<&str> {
        self.writes.iter().map(|w| w.text.as_str()).collect()
    }
}

impl Display for MockDisplay {
    fn max_x(&self) -> i32 {
        799
    }

    fn max_y(&self) -> i32 {
        479
    }

    fn clear(&mut self, _color: Rgb565) {
        self.clears += 1;
        self.writes.clear();
        self.buttons.clear();
    }

    fn fill_rect(&mut self, _top_left: Point, _bottom_right: Point, _color: Rgb565) {}

    fn fill_circle(&mut self, _center: Point, _radius: u32, _color: Rgb565) {}

    fn line(&mut self, _from: Point, _to: Point, _color: Rgb565) {}

    fn draw_button(&mut self, top_left: Point, style: &ButtonStyle, label: &str) {
        self.buttons.push(ButtonRecord {
            top_left,
            label: label.to_string(),
            face: style.face,
        });
    }

    fn move_to(&mut self, pos: Point) {
        self.cursor = pos;
    }

    fn set_font(&mut self, _font: u8) {}

    fn set_width_scale(&mut self, scale: u8) {
        self.width_scale = scale.max(1);
    }

    fn set_height_scale(&mut self, scale: u8) {
        self.height_scale = scale.max(1);
    }

    fn set_line_gap(&mut self, _gap: u8) {}

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
        self.writes.push(TextRecord {
            pos: self.cursor,
            text: text.to_string(),
            foreground: self.foreground,
            background: self.background,
            underline: self.underline,
        });
        self.cursor.x += self.char_width() * text.chars().count() as i32;
    }

    fn char_width(&self) -> i32 {
        8 * i32::from(self.width_scale)
    }

    fn char_height(&self) -> i32 {
        16 * i32::from(self.height_scale)
    }

    fn button_size(&self, label_len: usize, _font: u8, scale: u8) -> Size {
        let scale = u32::from(scale.max(1));
        Size::new(label_len as u32 * 8 * scale + 16, 16 * scale + 16)
    }

    fn enable_touch(&mut self, _enabled: bool) {}

    fn touch_state(&mut self) -> TouchState {
        let Some(sample) = self.script.pop_front() else {
            panic!("touch script exhausted");
        };
        self.last = sample;
        sample.state
    }

    fn touch_x(&mut self) -> i32 {
        self.last.x
    }

    fn touch_y(&mut self) -> i32 {
        self.last.y
    }

    fn set_pin(&mut self, pin: u8, high: bool) {
        self.pins.push((pin, high));
    }

    fn sleep(&mut self, units: u16) -> u16 {
        self.sleeps.push(units);
        0
    }
}

/// Clock that advances by a fixed step on every read.
pub struct StepClock {
    now: u64,
    step: u64,
}

impl StepClock {
    pub fn new(step: u64) -> Self {
        Self::starting_at(0, step)
    }

    pub fn starting_at(now: u64, step: u64) -> Self {
        Self { now, step }
    }
}

impl Clock for StepClock {
    fn now_ms(&mut self) -> u64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    NotFound,
}

impl embedded_io::Error for MemError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NotFound
    }
}

impl core::fmt::Display for MemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("no such file or directory")
    }
}

type Contents = Rc<RefCell<Vec<u8>>>;

/// In-memory filesystem. File contents are shared with open handles, so a
/// test can append to a file that is being read.
#[derive(Default)]
pub struct MemFs {
    files: RefCell<BTreeMap<String, Contents>>,
    dirs: BTreeMap<String, Vec<String>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.with_bytes(path, contents.as_bytes())
    }

    pub fn with_bytes(self, path: &str, contents: &[u8]) -> Self {
        self.files
            .borrow_mut()
            .insert(path.to_string(), Rc::new(RefCell::new(contents.to_vec())));
        self
    }

    pub fn with_dir(mut self, path: &str, entries: &[&str]) -> Self {
        self.dirs.insert(
            path.to_string(),
            entries.iter().map(|entry| entry.to_string()).collect(),
        );
        self
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(path)
            .map(|data| String::from_utf8_lossy(&data.borrow()).into_owned())
    }

    pub fn append(&self, path: &str, text: &str) {
        if let Some(data) = self.files.borrow().get(path) {
            data.borrow_mut().extend_from_slice(text.as_bytes());
        }
    }
}

pub struct MemFile {
    data: Contents,
    pos: usize,
}

impl ErrorType for MemFile {
    type Error = MemError;
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let data = self.data.borrow();
        let available = data.len().saturating_sub(self.pos);
        let n = available.min(buf.len());
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.data.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl File for MemFile {}

impl Filesystem for MemFs {
    type Error = MemError;
    type File<'a>
        = MemFile
    where
        Self: 'a;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File<'_>, Self::Error> {
        let mut files = self.files.borrow_mut();
        let data = match mode {
            Mode::Read => files.get(path).cloned().ok_or(MemError::NotFound)?,
            Mode::Write => {
                let data = files
                    .entry(path.to_string())
                    .or_insert_with(|| Rc::new(RefCell::new(Vec::new())))
                    .clone();
                data.borrow_mut().clear();
                data
            }
        };
        Ok(MemFile { data, pos: 0 })
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>, Self::Error> {
        self.dirs.get(path).cloned().ok_or(MemError::NotFound)
    }
}
