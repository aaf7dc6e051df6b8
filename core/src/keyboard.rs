use alloc::{string::String, vec::Vec};

use embedded_graphics::prelude::{Point, Size};

use crate::config::Config;
use crate::display::{ButtonStyle, Display};
use crate::ui::geom::Region;
use crate::ui::key;

const KEYBOARD_MARGIN: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Horizontal gap in pixels.
    Spacer(i32),
    Key {
        value: &'static str,
        label: &'static str,
    },
}

const fn k(value: &'static str, label: &'static str) -> Cell {
    Cell::Key { value, label }
}

const fn c(value: &'static str) -> Cell {
    Cell::Key {
        value,
        label: value,
    }
}

#[derive(Debug)]
pub struct Layout {
    pub name: &'static str,
    pub rows: &'static [&'static [Cell]],
}

#[rustfmt::skip]
pub static NORMAL: Layout = Layout {
    name: "Normal",
    rows: &[
        &[
            k("q", "Q"), k("w", "W"), k("e", "E"), k("r", "R"), k("t", "T"),
            k("y", "Y"), k("u", "U"), k("i", "I"), k("o", "O"), k("p", "P"),
            c(key::DELETE),
        ],
        &[
            Cell::Spacer(21),
            k("a", "A"), k("s", "S"), k("d", "D"), k("f", "F"), k("g", "G"),
            k("h", "H"), k("j", "J"), k("k", "K"), k("l", "L"),
            c(key::DONE),
        ],
        &[
            c(key::SHIFT),
            k("z", "Z"), k("x", "X"), k("c", "C"), k("v", "V"), k("b", "B"),
            k("n", "N"), k("m", "M"), c(","), c("."),
        ],
        &[
            k("Symbols", "?123"),
            Cell::Spacer(20),
            k(" ", "Space"),
            Cell::Spacer(20),
            c(key::CANCEL),
        ],
    ],
};

#[rustfmt::skip]
pub static SYMBOLS: Layout = Layout {
    name: "Symbols",
    rows: &[
        &[
            c("1"), c("2"), c("3"), c("4"), c("5"),
            c("6"), c("7"), c("8"), c("9"), c("0"),
            c(key::DELETE),
        ],
        &[
            c("-"), c("/"), c(":"), c(";"), c("("),
            c(")"), c("$"), c("&"), c("@"), c("\""),
            c(key::DONE),
        ],
        &[
            k("More", "#+="),
            Cell::Spacer(20),
            c("."), c(","), c("?"), c("!"), c("'"),
        ],
        &[
            k("Normal", "abc"),
            Cell::Spacer(20),
            k(" ", "Space"),
            Cell::Spacer(20),
            c(key::CANCEL),
        ],
    ],
};

#[rustfmt::skip]
pub static MORE: Layout = Layout {
    name: "More",
    rows: &[
        &[
            c("["), c("]"), c("{"), c("}"), c("#"),
            c("%"), c("^"), c("*"), c("+"), c("="),
            c(key::DELETE),
        ],
        &[
            c("_"), c("\\"), c("|"), c("~"), c("<"),
            c(">"), c("`"),
            c(key::DONE),
        ],
        &[c(key::BACK)],
        &[
            k("Normal", "abc"),
            Cell::Spacer(20),
            k(" ", "Space"),
            Cell::Spacer(20),
            c(key::CANCEL),
        ],
    ],
};

#[rustfmt::skip]
pub static NUMERIC: Layout = Layout {
    name: "Numeric",
    rows: &[
        &[c("7"), c("8"), c("9"), c(key::DELETE)],
        &[c("4"), c("5"), c("6"), c(key::DONE)],
        &[c("1"), c("2"), c("3"), c("-")],
        &[c("0"), c("."), c(key::CANCEL)],
    ],
};

pub static LAYOUTS: [&Layout; 4] = [&NORMAL, &SYMBOLS, &MORE, &NUMERIC];

pub fn layout(name: &str) -> Option<&'static Layout> {
    LAYOUTS.iter().copied().find(|layout| layout.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    None,
    Shift,
    CapsLock,
}

impl ShiftState {
    pub fn next(self) -> Self {
        match self {
            ShiftState::None => ShiftState::Shift,
            ShiftState::Shift => ShiftState::CapsLock,
            ShiftState::CapsLock => ShiftState::None,
        }
    }

    pub fn is_active(self) -> bool {
        self != ShiftState::None
    }

    fn palette_index(self) -> usize {
        match self {
            ShiftState::None => 0,
            ShiftState::Shift => 1,
            ShiftState::CapsLock => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Insert(String),
    Backspace { clear_left: bool },
    Done { split: bool },
    Cancel,
    /// Another layout is active and the keyboard must be repainted.
    LayoutChanged,
    ShiftChanged,
    Ignored,
}

/// Placed key of the active layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCap {
    pub top_left: Point,
    pub scale: u8,
    pub label: &'static str,
    pub region: Region,
}

pub struct Keyboard {
    layout: &'static Layout,
    previous: Option<&'static Layout>,
    shift: ShiftState,
    shift_key: Option<KeyCap>,
}

impl Keyboard {
    pub fn new(layout_name: &str) -> Self {
        let layout = layout(layout_name).unwrap_or_else(|| {
            log::warn!("Unknown keyboard layout {:?}, using {}", layout_name, NORMAL.name);
            &NORMAL
        });
        Self {
            layout,
            previous: None,
            shift: ShiftState::None,
            shift_key: None,
        }
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    pub fn handle(&mut self, pressed: &str) -> KeyAction {
        match pressed {
            key::SHIFT => {
                self.shift = self.shift.next();
                KeyAction::ShiftChanged
            }
            key::BACK => match self.previous.take() {
                Some(previous) => {
                    self.switch_to(previous);
                    KeyAction::LayoutChanged
                }
                None => KeyAction::Ignored,
            },
            key::DELETE => {
                let clear_left = self.shift.is_active();
                self.consume_shift();
                KeyAction::Backspace { clear_left }
            }
            key::DONE => KeyAction::Done {
                split: self.shift.is_active(),
            },
            key::CANCEL => KeyAction::Cancel,
            other => {
                if let Some(next) = layout(other) {
                    self.previous = Some(self.layout);
                    self.switch_to(next);
                    return KeyAction::LayoutChanged;
                }
                let text = if self.shift.is_active() {
                    other.to_uppercase()
                } else {
                    String::from(other)
                };
                self.consume_shift();
                KeyAction::Insert(text)
            }
        }
    }

    fn switch_to(&mut self, layout: &'static Layout) {
        log::debug!("Keyboard layout {} -> {}", self.layout.name, layout.name);
        self.layout = layout;
        self.shift = ShiftState::None;
    }

    fn consume_shift(&mut self) {
        if self.shift == ShiftState::Shift {
            self.shift = ShiftState::None;
        }
    }

    /// Places the keys of the active layout along the bottom of the screen.
    /// Returns the top edge of the keyboard and the keys in row order.
    pub fn layout_keys<D: Display>(&self, display: &D, config: &Config) -> (i32, Vec<KeyCap>) {
        let key_height = display.button_size(1, config.font, config.key_scale).height as i32;
        let rows = self.layout.rows.len() as i32;
        let top = display.max_y() + 1 - KEYBOARD_MARGIN - rows * (key_height + config.key_gap);
        let mut caps = Vec::new();
        for (row_index, row) in self.layout.rows.iter().enumerate() {
            let y = top + row_index as i32 * (key_height + config.key_gap);
            let mut x = KEYBOARD_MARGIN;
            for cell in row.iter() {
                match *cell {
                    Cell::Spacer(pixels) => x += pixels,
                    Cell::Key { value, label } => {
                        let len = label.chars().count();
                        let scale = if len > 1 {
                            config.narrow_scale
                        } else {
                            config.key_scale
                        };
                        let size = display.button_size(len, config.font, scale);
                        let offset = (key_height - size.height as i32).max(0) / 2;
                        caps.push(KeyCap {
                            top_left: Point::new(x, y + offset),
                            scale,
                            label,
                            region: Region::from_size(
                                Point::new(x, y),
                                Size::new(size.width, key_height as u32),
                                value,
                            ),
                        });
                        x += size.width as i32 + config.key_gap;
                    }
                }
            }
        }
        (top, caps)
    }

    /// Draws every key and appends their touch regions. Returns the top
    /// edge of the keyboard.
    pub fn draw<D: Display>(
        &mut self,
        display: &mut D,
        config: &Config,
        regions: &mut Vec<Region>,
    ) -> i32 {
        let (top, caps) = self.layout_keys(display, config);
        self.shift_key = None;
        for cap in caps {
            let mut style = config.button(cap.scale);
            if cap.region.key == key::SHIFT {
                style.face = config.shift_palette[self.shift.palette_index()];
                self.shift_key = Some(cap.clone());
            }
            display.draw_button(cap.top_left, &style, cap.label);
            regions.push(cap.region);
        }
        top
    }

    /// Repaints only the shift key in the colour of the current shift state.
    pub fn draw_shift<D: Display>(&self, display: &mut D, config: &Config) {
        if let Some(cap) = &self.shift_key {
            let style = ButtonStyle {
                face: config.shift_palette[self.shift.palette_index()],
                ..config.button(cap.scale)
            };
            display.draw_button(cap.top_left, &style, cap.label);
        }
    }
}
