//! Stand-in screens for tabs that have no content yet.

use super::Screen;
use crate::app::App;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    widgets::{Paragraph, Widget},
};

/// A tab that only shows a centered notice.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderScreen {
    notice: &'static str,
}

impl PlaceholderScreen {
    pub const TASKS: Self = Self {
        notice: "Tasks view coming soon...",
    };

    pub const SCHEDULE: Self = Self {
        notice: "Schedule view coming soon...",
    };
}

impl Screen for PlaceholderScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let line_area = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        Paragraph::new(self.notice)
            .style(Styles::muted())
            .alignment(Alignment::Center)
            .render(line_area, buf);
    }
}
