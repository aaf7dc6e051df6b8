use alloc::{format, string::String, vec::Vec};

use crate::{
    application::Application,
    display::Display,
    fs::{Filesystem, read_lines, write_lines},
    input::Clock,
    text::split_at_char,
    ui::{InputRequest, InputResult, ListEvent, ListItem, ListRequest},
};

const SAVE: &str = "Save";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Delete,
    InsertBefore,
    InsertAfter,
}

const LINE_ACTIONS: [(&str, LineAction); 3] = [
    ("Delete line", LineAction::Delete),
    ("Insert line before", LineAction::InsertBefore),
    ("Insert line after", LineAction::InsertAfter),
];

/// Stores an edited line. A split point breaks the line in two, the text
/// from the cursor on becoming a new line below. Returns whether anything
/// changed.
pub fn apply_edit(lines: &mut Vec<String>, index: usize, result: InputResult) -> bool {
    match result.split_at {
        Some(at) => {
            let (head, tail) = split_at_char(&result.text, at.saturating_sub(1));
            lines[index] = head;
            lines.insert(index + 1, tail);
            true
        }
        None if lines[index] != result.text => {
            lines[index] = result.text;
            true
        }
        None => false,
    }
}

/// The file always keeps at least one line.
pub fn apply_line_action(lines: &mut Vec<String>, index: usize, action: LineAction) {
    match action {
        LineAction::Delete => {
            lines.remove(index);
            if lines.is_empty() {
                lines.push(String::new());
            }
        }
        LineAction::InsertBefore => lines.insert(index, String::new()),
        LineAction::InsertAfter => lines.insert(index + 1, String::new()),
    }
}

impl<D: Display, C: Clock> Application<D, C> {
    /// Line-by-line editor for a text file.
    ///
    /// Tapping a line opens it on the keyboard; a long press offers to
    /// delete it or insert a blank line next to it. Changes arm a Save
    /// button and Cancel asks before dropping them.
    pub fn edit_file<F: Filesystem>(&mut self, fs: &F, path: &str) {
        let (mut lines, ending) = match read_lines(fs, path) {
            Ok(read) => read,
            Err(err) => {
                log::warn!("Cannot open {}: {}", path, err);
                self.message("Error", &format!("Cannot open {}\n{}", path, err));
                return;
            }
        };
        if lines.is_empty() {
            lines.push(String::new());
        }

        let mut dirty = false;
        let mut offset = 1;
        loop {
            let items = lines.iter().map(|line| ListItem::new(line.as_str())).collect();
            let mut request = ListRequest::new(items)
                .title(path)
                .offset(offset)
                .long_press(true);
            if dirty {
                request = request.extra(SAVE);
            }

            match self.listbox_with(request) {
                None => {
                    if !dirty || self.confirm("Unsaved changes", "Discard your changes?") {
                        return;
                    }
                }
                Some(ListEvent::Extra { offset: at }) => {
                    offset = at;
                    match write_lines(fs, path, &lines, ending) {
                        Ok(()) => {
                            log::info!("Saved {} lines to {}", lines.len(), path);
                            dirty = false;
                        }
                        Err(err) => {
                            log::warn!("Cannot save {}: {}", path, err);
                            self.message("Error", &format!("Cannot save {}\n{}", path, err));
                        }
                    }
                }
                Some(ListEvent::Selected(selection)) => {
                    offset = selection.offset;
                    let index = selection.index - 1;
                    if selection.long_press {
                        let Some(action) = self.line_menu(selection.index) else {
                            continue;
                        };
                        if action == LineAction::Delete
                            && !self.confirm("Delete", &format!("Delete line {}?", selection.index))
                        {
                            continue;
                        }
                        apply_line_action(&mut lines, index, action);
                        dirty = true;
                    } else {
                        let prompt = format!("Line {}", selection.index);
                        // never cut a line that is already longer than the limit
                        let max_len = self.config.max_line_len.max(lines[index].chars().count());
                        let request = InputRequest::new(&prompt)
                            .default_text(&lines[index])
                            .max_len(max_len);
                        if let Some(result) = self.input_with(&request) {
                            dirty |= apply_edit(&mut lines, index, result);
                        }
                    }
                }
            }
        }
    }

    fn line_menu(&mut self, line: usize) -> Option<LineAction> {
        let title = format!("Line {}", line);
        let items = LINE_ACTIONS
            .iter()
            .map(|(label, _)| ListItem::new(*label))
            .collect();
        match self.listbox_with(ListRequest::new(items).title(&title))? {
            ListEvent::Selected(selection) => LINE_ACTIONS
                .get(selection.index - 1)
                .map(|(_, action)| *action),
            ListEvent::Extra { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::keyboard::Keyboard;
    use crate::testing::{MemFs, MockDisplay, StepClock};
    use crate::ui::key;
    use alloc::string::ToString;
    use embedded_graphics::prelude::Point;

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn split_edit_inserts_remainder_below() {
        let mut lines = strings(&["alpha", "beta", "gamma"]);
        let result = InputResult {
            text: "beta".to_string(),
            split_at: Some(3),
        };
        assert!(apply_edit(&mut lines, 1, result));
        assert_eq!(lines, ["alpha", "be", "ta", "gamma"]);
    }

    #[test]
    fn unchanged_edit_is_not_dirty() {
        let mut lines = strings(&["alpha"]);
        let same = InputResult {
            text: "alpha".to_string(),
            split_at: None,
        };
        assert!(!apply_edit(&mut lines, 0, same));
        let changed = InputResult {
            text: "omega".to_string(),
            split_at: None,
        };
        assert!(apply_edit(&mut lines, 0, changed));
        assert_eq!(lines, ["omega"]);
    }

    #[test]
    fn line_actions() {
        let mut lines = strings(&["a", "b"]);
        apply_line_action(&mut lines, 1, LineAction::InsertBefore);
        assert_eq!(lines, ["a", "", "b"]);
        apply_line_action(&mut lines, 2, LineAction::InsertAfter);
        assert_eq!(lines, ["a", "", "b", ""]);
        apply_line_action(&mut lines, 0, LineAction::Delete);
        assert_eq!(lines, ["", "b", ""]);

        let mut single = strings(&["only"]);
        apply_line_action(&mut single, 0, LineAction::Delete);
        assert_eq!(single, [""]);
    }

    fn app() -> Application<MockDisplay, StepClock> {
        Application::new(MockDisplay::new(), StepClock::new(100), Config::default())
    }

    fn key_at(app: &Application<MockDisplay, StepClock>, value: &str) -> Point {
        let (_, caps) = Keyboard::new("Normal").layout_keys(app.display(), app.config());
        caps.into_iter()
            .find(|cap| cap.region.key == value)
            .map(|cap| cap.region.center())
            .unwrap()
    }

    fn press_keys(app: &mut Application<MockDisplay, StepClock>, values: &[&str]) {
        for value in values {
            let at = key_at(app, value);
            app.display_mut().tap_at(at);
        }
    }

    // Rows start at y = 44, 20 px apart. The list accepts long presses, so
    // row taps carry a release. Save sits at y = 402, Cancel at y = 440.
    fn row(app: &mut Application<MockDisplay, StepClock>, row: i32) {
        app.display_mut().hold(100, 44 + row * 20 + 5, 0);
    }

    fn save(app: &mut Application<MockDisplay, StepClock>) {
        app.display_mut().hold(740, 410, 0);
    }

    fn cancel(app: &mut Application<MockDisplay, StepClock>) {
        app.display_mut().hold(740, 450, 0);
    }

    #[test]
    fn split_line_and_save() {
        let fs = MemFs::new().with_file("/a.txt", "alpha\nbeta\n");
        let mut app = app();
        row(&mut app, 1);
        // "beta" is drawn at 16 px per character; put the cursor before "t"
        app.display_mut().tap(8 + 2 * 16 + 2, 40);
        press_keys(&mut app, &[key::SHIFT, key::DONE]);
        save(&mut app);
        cancel(&mut app);
        app.edit_file(&fs, "/a.txt");
        assert_eq!(fs.contents("/a.txt").unwrap(), "alpha\nbe\nta\n");
    }

    #[test]
    fn long_press_delete_asks_first() {
        let fs = MemFs::new().with_file("/a.txt", "a\nb\nc\n");
        let mut app = app();
        app.display_mut().hold(100, 44 + 20 + 5, 12);
        // line menu: "Delete line" is the first row
        app.display_mut().tap(100, 50);
        // Yes
        app.display_mut().tap(10, 450);
        save(&mut app);
        cancel(&mut app);
        app.edit_file(&fs, "/a.txt");
        assert_eq!(fs.contents("/a.txt").unwrap(), "a\nc\n");
    }

    #[test]
    fn cancel_with_changes_needs_confirmation() {
        let fs = MemFs::new().with_file("/a.txt", "a\n");
        let mut app = app();
        app.display_mut().hold(100, 44 + 5, 12);
        // "Insert line after"
        app.display_mut().tap(100, 44 + 2 * 20 + 5);
        cancel(&mut app);
        // No: back to the list
        app.display_mut().tap(60, 450);
        cancel(&mut app);
        // Yes: drop the change
        app.display_mut().tap(10, 450);
        app.edit_file(&fs, "/a.txt");
        assert_eq!(fs.contents("/a.txt").unwrap(), "a\n");
        assert!(app.display().script_is_empty());
    }

    #[test]
    fn saving_keeps_crlf_line_endings() {
        let fs = MemFs::new().with_file("/dos.txt", "a\r\nb\r\n");
        let mut app = app();
        app.display_mut().hold(100, 44 + 5, 12);
        // "Insert line after"
        app.display_mut().tap(100, 44 + 2 * 20 + 5);
        save(&mut app);
        cancel(&mut app);
        app.edit_file(&fs, "/dos.txt");
        assert_eq!(fs.contents("/dos.txt").unwrap(), "a\r\n\r\nb\r\n");
    }

    #[test]
    fn empty_file_opens_with_one_blank_line() {
        let fs = MemFs::new().with_file("/new.txt", "");
        let mut app = app();
        row(&mut app, 0);
        press_keys(&mut app, &["x", key::DONE]);
        save(&mut app);
        cancel(&mut app);
        app.edit_file(&fs, "/new.txt");
        assert_eq!(fs.contents("/new.txt").unwrap(), "x\n");
    }

    #[test]
    fn over_long_line_keeps_its_text() {
        let long = "a".repeat(300);
        let fs = MemFs::new().with_file("/long.txt", &format!("{}\n", long));
        let mut app = app();
        row(&mut app, 0);
        press_keys(&mut app, &[key::DELETE, key::DONE]);
        save(&mut app);
        cancel(&mut app);
        app.edit_file(&fs, "/long.txt");
        assert_eq!(fs.contents("/long.txt").unwrap(), format!("{}\n", "a".repeat(299)));
    }

    #[test]
    fn missing_file_is_reported() {
        let fs = MemFs::new();
        let mut app = app();
        app.display_mut().tap(10, 450);
        app.edit_file(&fs, "/gone.txt");
        let text = app.display().written_text();
        assert_eq!(&text[1..], ["Cannot open /gone.txt", "no such file or directory"]);
    }
}
