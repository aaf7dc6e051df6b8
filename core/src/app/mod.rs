//! File flows built from the widgets: browsing, tailing and editing.

pub mod browser;
pub mod editor;
pub mod viewer;

pub use browser::BrowseResult;
pub use editor::{LineAction, apply_edit, apply_line_action};
pub use viewer::TailView;
