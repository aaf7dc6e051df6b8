use alloc::{string::String, vec::Vec};

use embedded_graphics::{pixelcolor::Rgb565, prelude::Point};

use crate::{
    application::{Application, MARGIN, SideButton},
    display::Display,
    input::{Clock, PollMode},
    text::cut,
    ui::{Region, key},
};

const EXTRA: &str = "extra";
const EMPTY_LIST: &str = "No entries";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    /// Returned on selection; the text itself unless set.
    pub value: String,
    pub color: Option<Rgb565>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            text,
            color: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for ListItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Page of items over a longer list. `offset` is the 1-based index of the
/// first visible item.
#[derive(Debug, Clone)]
pub struct ListBox {
    items: Vec<ListItem>,
    offset: usize,
    rows: usize,
}

impl ListBox {
    pub fn new(items: Vec<ListItem>, offset: usize, rows: usize) -> Self {
        let offset = offset.clamp(1, items.len().max(1));
        Self {
            items,
            offset,
            rows: rows.max(1),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible(&self) -> &[ListItem] {
        let start = (self.offset - 1).min(self.items.len());
        let end = (start + self.rows).min(self.items.len());
        &self.items[start..end]
    }

    pub fn can_page_up(&self) -> bool {
        self.offset > 1
    }

    pub fn can_page_down(&self) -> bool {
        self.offset + self.rows <= self.items.len()
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.rows).max(1);
    }

    pub fn page_down(&mut self) {
        if self.can_page_down() {
            self.offset += self.rows;
        }
    }

    /// Maps a y offset from the top of the first row to the 1-based index
    /// of the item drawn there.
    pub fn row_at(&self, dy: i32, row_height: i32) -> Option<usize> {
        if row_height <= 0 {
            return None;
        }
        let row = (dy / row_height).max(0) as usize;
        let index = self.offset + row;
        (row < self.rows && index <= self.items.len()).then_some(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub value: String,
    pub long_press: bool,
    /// 1-based index into the items.
    pub index: usize,
    /// Page offset when the item was picked, for resuming the list.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Selected(Selection),
    /// The extra action button was pressed.
    Extra { offset: usize },
}

#[derive(Debug, Clone)]
pub struct ListRequest<'a> {
    pub title: Option<&'a str>,
    pub items: Vec<ListItem>,
    pub offset: usize,
    /// Label of an extra action button below the paging controls.
    pub extra: Option<&'a str>,
    pub cancel: bool,
    /// Report touches held past the configured threshold.
    pub long_press: bool,
}

impl<'a> ListRequest<'a> {
    pub fn new(items: Vec<ListItem>) -> Self {
        Self {
            title: None,
            items,
            offset: 1,
            extra: None,
            cancel: true,
            long_press: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn extra(mut self, label: &'a str) -> Self {
        self.extra = Some(label);
        self
    }

    pub fn cancel(mut self, cancel: bool) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn long_press(mut self, long_press: bool) -> Self {
        self.long_press = long_press;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListGeometry {
    pub left: i32,
    pub right: i32,
    pub rows_top: i32,
    pub row_height: i32,
    pub rows: usize,
    pub columns: usize,
    pub buttons_x: i32,
}

impl<D: Display, C: Clock> Application<D, C> {
    /// Plain list with a Cancel button. `None` on Cancel.
    pub fn listbox(&mut self, title: Option<&str>, items: &[&str]) -> Option<Selection> {
        let items = items.iter().map(|&text| ListItem::from(text)).collect();
        let mut request = ListRequest::new(items);
        request.title = title;
        match self.listbox_with(request)? {
            ListEvent::Selected(selection) => Some(selection),
            ListEvent::Extra { .. } => None,
        }
    }

    pub fn listbox_with(&mut self, request: ListRequest<'_>) -> Option<ListEvent> {
        let geometry = self.list_layout(request.title.is_some(), request.extra, request.cancel);
        let mut list = ListBox::new(request.items, request.offset, geometry.rows);
        let long_press_ms = if request.long_press {
            self.config.long_press_ms
        } else {
            0
        };
        let mut regions = Vec::new();
        loop {
            regions.clear();
            self.draw_list(
                request.title,
                &list,
                request.extra,
                request.cancel,
                &geometry,
                &mut regions,
            );
            loop {
                let Some(event) =
                    self.poller
                        .poll_key(&mut self.display, &regions, long_press_ms, PollMode::Blocking)
                else {
                    continue;
                };
                match event.key.as_str() {
                    key::UP => list.page_up(),
                    key::DOWN => list.page_down(),
                    key::CANCEL => return None,
                    EXTRA => {
                        return Some(ListEvent::Extra {
                            offset: list.offset(),
                        });
                    }
                    key::IN_WINDOW => {
                        let dy = event.y - geometry.rows_top;
                        let Some(index) = list.row_at(dy, geometry.row_height) else {
                            continue;
                        };
                        return Some(ListEvent::Selected(Selection {
                            value: list.items()[index - 1].value.clone(),
                            long_press: event.long_press,
                            index,
                            offset: list.offset(),
                        }));
                    }
                    _ => continue,
                }
                break;
            }
        }
    }

    /// Rows fill the space left of the button column, centred vertically.
    pub(crate) fn list_layout(
        &mut self,
        has_title: bool,
        extra: Option<&str>,
        cancel: bool,
    ) -> ListGeometry {
        let top = if has_title { self.title_height() } else { MARGIN };
        let mut labels = Vec::from([key::UP, key::DOWN]);
        labels.extend(extra);
        if cancel {
            labels.push(key::CANCEL);
        }
        let buttons_x = self.side_column_x(&labels);
        let right = buttons_x - MARGIN - 1;
        let cell = self.text_scale(self.config.list_scale);
        let row_height = cell.height as i32 + i32::from(self.config.line_gap);
        let available = self.screen_size().height as i32 - MARGIN - top;
        let rows = (available / row_height).max(1);
        let leftover = (available - rows * row_height).max(0);
        ListGeometry {
            left: MARGIN,
            right,
            rows_top: top + leftover / 2,
            row_height,
            rows: rows as usize,
            columns: ((right - MARGIN + 1) / cell.width as i32).max(1) as usize,
            buttons_x,
        }
    }

    fn draw_list(
        &mut self,
        title: Option<&str>,
        list: &ListBox,
        extra: Option<&str>,
        cancel: bool,
        geometry: &ListGeometry,
        regions: &mut Vec<Region>,
    ) {
        let top = self.begin_screen(title);
        self.text_scale(self.config.list_scale);
        if list.items().is_empty() {
            self.write_at(
                Point::new(geometry.left, geometry.rows_top),
                EMPTY_LIST,
                self.config.disabled,
                self.config.background,
            );
        }
        for (row, item) in list.visible().iter().enumerate() {
            let y = geometry.rows_top + row as i32 * geometry.row_height;
            let text = cut(&item.text, geometry.columns);
            let color = item.color.unwrap_or(self.config.foreground);
            self.write_at(Point::new(geometry.left, y), &text, color, self.config.background);
        }
        regions.push(Region::new(
            geometry.left,
            geometry.rows_top,
            geometry.right,
            geometry.rows_top + geometry.rows as i32 * geometry.row_height - 1,
            key::IN_WINDOW,
        ));

        let paging = [
            SideButton {
                label: key::UP,
                key: key::UP,
                enabled: list.can_page_up(),
            },
            SideButton {
                label: key::DOWN,
                key: key::DOWN,
                enabled: list.can_page_down(),
            },
        ];
        let mut bottom = Vec::new();
        if let Some(label) = extra {
            bottom.push(SideButton {
                label,
                key: EXTRA,
                enabled: true,
            });
        }
        if cancel {
            bottom.push(SideButton {
                label: key::CANCEL,
                key: key::CANCEL,
                enabled: true,
            });
        }
        self.side_column(geometry.buttons_x, top, &paging, &bottom, regions);
    }
}
