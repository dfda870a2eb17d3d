//! UI module for the duke TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
pub use theme::*;
pub use widgets::*;
