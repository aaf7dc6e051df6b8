use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    application::Application,
    display::Display,
    fs::Filesystem,
    input::Clock,
    ui::{ListEvent, ListItem, ListRequest},
};

const PARENT: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResult {
    pub path: String,
    /// Picked with a long press; directories are returned instead of opened.
    pub long_press: bool,
}

/// Directory being browsed, kept as segments so `..` is a pop.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathStack {
    absolute: bool,
    segments: Vec<String>,
}

impl PathStack {
    fn parse(path: &str) -> Self {
        let mut stack = Self {
            absolute: path.starts_with('/'),
            segments: Vec::new(),
        };
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                PARENT if stack.segments.last().is_some_and(|last| last != PARENT) => {
                    stack.segments.pop();
                }
                _ => stack.segments.push(segment.to_string()),
            }
        }
        stack
    }

    fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Strictly inside `root`.
    fn is_below(&self, root: &PathStack) -> bool {
        self.absolute == root.absolute
            && self.depth() > root.depth()
            && self.segments.starts_with(&root.segments)
    }

    fn path_of(&self, name: Option<&str>) -> String {
        let mut path = String::from(if self.absolute { "" } else { "." });
        for segment in self.segments.iter().map(String::as_str).chain(name) {
            path.push('/');
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

/// Directories first, then files, each by name.
fn sort_entries(entries: &mut [String]) {
    entries.sort_by(|a, b| {
        b.ends_with('/')
            .cmp(&a.ends_with('/'))
            .then_with(|| a.cmp(b))
    });
}

impl<D: Display, C: Clock> Application<D, C> {
    /// Lets the user walk the directory tree from `start` and pick a file.
    ///
    /// `..` is offered only while the current directory is below `root`.
    /// Returns `None` on Cancel or when a directory cannot be listed.
    pub fn browse_file<F: Filesystem>(
        &mut self,
        fs: &F,
        start: &str,
        root: Option<&str>,
    ) -> Option<BrowseResult> {
        let mut stack = PathStack::parse(start);
        let root = root.map(PathStack::parse);
        let mut offsets: Vec<usize> = Vec::new();
        let mut offset = 1;
        loop {
            let dir = stack.path_of(None);
            let mut entries = match fs.list_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("Cannot list {}: {}", dir, err);
                    self.message("Error", &format!("Cannot open {}\n{}", dir, err));
                    return None;
                }
            };
            sort_entries(&mut entries);

            let mut items = Vec::with_capacity(entries.len() + 1);
            let below_root = root
                .as_ref()
                .map_or(stack.depth() > 0, |root| stack.is_below(root));
            if below_root {
                items.push(ListItem::new(PARENT).with_color(self.config.directory));
            }
            for entry in entries {
                let item = if entry.ends_with('/') {
                    ListItem::new(entry).with_color(self.config.directory)
                } else {
                    ListItem::new(entry)
                };
                items.push(item);
            }

            let request = ListRequest::new(items)
                .title(&dir)
                .offset(offset)
                .long_press(true);
            let ListEvent::Selected(selection) = self.listbox_with(request)? else {
                return None;
            };

            if selection.value == PARENT {
                stack.segments.pop();
                offset = offsets.pop().unwrap_or(1);
                continue;
            }
            let name = selection.value.trim_end_matches('/');
            if selection.value.ends_with('/') && !selection.long_press {
                stack.segments.push(name.to_string());
                offsets.push(selection.offset);
                offset = 1;
                continue;
            }
            return Some(BrowseResult {
                path: stack.path_of(Some(name)),
                long_press: selection.long_press,
            });
        }
    }
}
