//! Bottom status line: current tab, key hints, and a right-hand indicator.

use crate::text::visual_width;
use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// A key and the action it triggers.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    label: &'a str,
    hints: &'a [KeyHint],
    indicator: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(label: &'a str, hints: &'a [KeyHint]) -> Self {
        Self {
            label,
            hints,
            indicator: None,
        }
    }

    /// Text pinned to the right edge. Dropped when it does not fit.
    #[must_use]
    pub fn indicator(mut self, text: &'a str) -> Self {
        self.indicator = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let row = Rect { height: 1, ..area };
        buf.set_style(row, Styles::status_line());

        let label = Span::styled(
            format!(" {} ", self.label),
            Styles::key_cap().bg(Palette::ACCENT_BRIGHT),
        );
        let hints = self.hints.iter().flat_map(|hint| {
            [
                Span::styled(format!(" {} ", hint.key), Styles::key_cap()),
                Span::styled(format!(" {} ", hint.action), Styles::key_caption()),
            ]
        });
        let line: Line = std::iter::once(label)
            .chain(std::iter::once(Span::raw(" ")))
            .chain(hints)
            .collect();
        buf.set_line(row.x, row.y, &line, row.width);

        if let Some(text) = self.indicator {
            let width = u16::try_from(visual_width(text)).unwrap_or(u16::MAX);
            if width < row.width {
                let x = row.right() - width - 1;
                buf.set_string(x, row.y, text, Styles::status_line());
            }
        }
    }
}
