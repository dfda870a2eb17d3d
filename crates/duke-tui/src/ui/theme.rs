//! Colors and styles for the duke TUI.
//!
//! A light theme with a teal accent: bot bubbles are white cards on a pale
//! gray page, user bubbles are solid teal.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(249, 250, 251);
    pub const FG: Color = Color::Rgb(55, 65, 81);
    pub const DIM: Color = Color::Rgb(107, 114, 128);
    pub const SURFACE: Color = Color::Rgb(255, 255, 255);

    pub const ACCENT: Color = Color::Rgb(13, 148, 136);
    pub const ACCENT_BRIGHT: Color = Color::Rgb(45, 212, 191);

    pub const USER_BG: Color = Self::ACCENT_BRIGHT;
    pub const USER_FG: Color = Self::SURFACE;

    pub const STATUS_BG: Color = Color::Rgb(229, 231, 235);

    pub const BORDER: Color = Color::Rgb(209, 213, 219);
}

/// Spinner frames for the thinking indicator.
pub const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Named styles.
pub struct Styles;

impl Styles {
    /// Body text on the page background.
    pub fn text() -> Style {
        Style::new().fg(Palette::FG).bg(Palette::BG)
    }

    /// Timestamps, placeholders, inactive tabs.
    pub fn muted() -> Style {
        Self::text().fg(Palette::DIM)
    }

    pub fn accent() -> Style {
        Self::text().fg(Palette::ACCENT)
    }

    /// Selected tab, assistant name.
    pub fn accent_bold() -> Style {
        Self::accent().add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::new().fg(Palette::FG).add_modifier(Modifier::BOLD)
    }

    pub fn bot_bubble() -> Style {
        Style::new().fg(Palette::FG).bg(Palette::SURFACE)
    }

    pub fn user_bubble() -> Style {
        Style::new().fg(Palette::USER_FG).bg(Palette::USER_BG)
    }

    /// Delivery glyph under user messages.
    pub fn receipt() -> Style {
        Self::text().fg(Palette::ACCENT_BRIGHT)
    }

    /// Key name in the status bar.
    pub fn key_cap() -> Style {
        Style::new()
            .fg(Palette::SURFACE)
            .bg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// What the key does, next to its [`Styles::key_cap`].
    pub fn key_caption() -> Style {
        Self::status_line()
    }

    pub fn status_line() -> Style {
        Style::new().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn frame() -> Style {
        Style::new().fg(Palette::BORDER)
    }

    pub fn frame_focused() -> Style {
        Style::new().fg(Palette::ACCENT)
    }
}

/// Spinner frame for the given tick.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frame_cycles() {
        assert_eq!(spinner_frame(0), "|");
        assert_eq!(spinner_frame(1), "/");
        assert_eq!(spinner_frame(4), "|");
    }

    #[test]
    fn test_muted_keeps_page_background() {
        assert_eq!(Styles::muted().bg, Some(Palette::BG));
        assert_eq!(Styles::muted().fg, Some(Palette::DIM));
    }
}
