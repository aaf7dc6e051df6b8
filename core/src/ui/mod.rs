pub mod dialog;
pub mod geom;
pub mod list_view;
pub mod text_input;

pub use geom::{Region, hit_test};
pub use list_view::{ListBox, ListEvent, ListItem, ListRequest, Selection};
pub use text_input::{InputRequest, InputResult, TextInput};

/// Logical keys shared by the widgets.
pub mod key {
    pub const CANCEL: &str = "Cancel";
    pub const DONE: &str = "Done";
    pub const UP: &str = "Up";
    pub const DOWN: &str = "Down";
    pub const SHIFT: &str = "Shift";
    pub const BACK: &str = "Back";
    pub const DELETE: &str = "Del";
    /// Tap inside a list or text field; the widget resolves the coordinates.
    pub const IN_WINDOW: &str = "inwindow";
}
