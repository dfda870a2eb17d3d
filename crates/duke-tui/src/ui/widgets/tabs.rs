//! Numbered tab strip along the top of the screen.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// Renders `[1] Chat | [2] Tasks | ...` with the selected tab highlighted.
#[derive(Debug, Clone)]
pub struct Tabs<'a> {
    titles: Vec<&'a str>,
    selected: usize,
}

impl<'a> Tabs<'a> {
    pub fn new(titles: Vec<&'a str>) -> Self {
        Self {
            titles,
            selected: 0,
        }
    }

    #[must_use]
    pub fn select(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for Tabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let row = Rect { height: 1, ..area };
        buf.set_style(row, Styles::text());

        let mut spans = Vec::with_capacity(self.titles.len() * 2);
        for (i, title) in self.titles.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Styles::muted()));
            }
            let style = if i == self.selected {
                Styles::accent_bold()
            } else {
                Styles::muted()
            };
            spans.push(Span::styled(format!("[{}] {title}", i + 1), style));
        }

        buf.set_line(row.x, row.y, &Line::from(spans), row.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::ui::theme::Palette;

    #[test]
    fn test_tabs_render_numbered_titles() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        Tabs::new(vec!["Chat", "Tasks", "Schedule"])
            .select(1)
            .render(area, &mut buf);

        insta::assert_snapshot!("tabs_numbered", buffer_to_string(&buf));
    }

    #[test]
    fn test_selected_tab_is_highlighted() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        Tabs::new(vec!["Chat", "Tasks"]).select(1).render(area, &mut buf);

        // "[1] Chat | [2] Tasks": the second title starts at column 15.
        assert_eq!(buf[(15, 0)].symbol(), "T");
        assert_eq!(buf[(15, 0)].fg, Palette::ACCENT);
        assert_eq!(buf[(4, 0)].fg, Palette::DIM);
    }
}
