//! Reusable widgets for the duke TUI.

pub mod status_bar;
mod tabs;
pub mod text_input;

pub use status_bar::{KeyHint, StatusBar};
pub use tabs::Tabs;
pub use text_input::TextInputState;
