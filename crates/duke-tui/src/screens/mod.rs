//! Screen definitions for the duke TUI.

pub mod chat;
pub mod placeholder;

use crate::app::{App, Tab};
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar, Tabs};
use crate::ui::{centered_fixed, shell_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const CHAT_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "Send"),
    KeyHint::new("PgUp/PgDn", "Scroll"),
    KeyHint::new("Tab", "Switch"),
    KeyHint::new("F1", "Help"),
];

const NAV_HINTS: &[KeyHint] = &[
    KeyHint::new("Tab", "Switch"),
    KeyHint::new("?", "Help"),
    KeyHint::new("q", "Quit"),
];

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the whole frame: tab bar, current tab, status bar and overlays.
pub fn render_frame(app: &App, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, Styles::text());

    let (tabs_area, body, status_area) = shell_layout(area);

    Tabs::new(Tab::ALL.iter().map(|t| t.title()).collect())
        .select(app.tab.index())
        .render(tabs_area, buf);

    match app.tab {
        Tab::Chat => chat::ChatScreen.render(app, body, buf),
        Tab::Tasks => placeholder::PlaceholderScreen::TASKS.render(app, body, buf),
        Tab::Schedule => placeholder::PlaceholderScreen::SCHEDULE.render(app, body, buf),
    }

    let right = if app.controller.is_pending() {
        "Waiting for reply"
    } else {
        "Online"
    };
    let hints = match app.tab {
        Tab::Chat => CHAT_HINTS,
        Tab::Tasks | Tab::Schedule => NAV_HINTS,
    };
    StatusBar::new(app.tab.title(), hints)
        .indicator(right)
        .render(status_area, buf);

    if app.show_help {
        render_help_overlay(area, buf);
    }
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Chat
    Enter             Send message
    Up/Down           Input history
    PgUp/PgDn         Scroll transcript

  Navigation
    Tab / Shift+Tab   Next/prev tab
    1 2 3             Jump to tab (outside chat)
    F1 or ?           Toggle this help
    Ctrl+C            Quit

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 16.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::heading())
        .borders(Borders::ALL)
        .border_style(Styles::frame_focused())
        .style(Styles::text());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::text())
        .render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_app_to_string, EchoService};
    use std::sync::Arc;

    #[test]
    fn test_frame_has_tabs_and_status_bar() {
        let app = create_test_app(Arc::new(EchoService));
        let screen = render_app_to_string(&app);
        let lines: Vec<&str> = screen.lines().collect();

        assert!(lines[0].contains("[1] Chat | [2] Tasks | [3] Schedule"));
        let status = lines.last().copied().unwrap_or_default();
        assert!(status.starts_with(" Chat "));
        assert!(status.ends_with("Online"));
    }

    #[test]
    fn test_help_overlay_renders() {
        let mut app = create_test_app(Arc::new(EchoService));
        app.show_help = true;
        let screen = render_app_to_string(&app);
        assert!(screen.contains(" Help "));
        assert!(screen.contains("Next/prev tab"));
    }

    #[test]
    fn test_placeholder_tabs() {
        let mut app = create_test_app(Arc::new(EchoService));
        app.tab = Tab::Tasks;
        assert!(render_app_to_string(&app).contains("Tasks view coming soon..."));

        app.tab = Tab::Schedule;
        let screen = render_app_to_string(&app);
        assert!(screen.contains("Schedule view coming soon..."));
        assert!(!screen.contains("Type a message"));
    }
}
