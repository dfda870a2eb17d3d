//! Single-line chat input with recall of previously sent entries.

use crate::text::visual_width;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Previously sent entries, browsed newest first.
#[derive(Debug, Clone, Default)]
struct InputHistory {
    entries: Vec<String>,
    /// Steps back from the newest entry while browsing.
    position: Option<usize>,
    /// What was being typed before browsing started.
    stash: String,
}

impl InputHistory {
    fn record(&mut self, entry: &str) {
        if !entry.trim().is_empty() {
            self.entries.push(entry.to_string());
        }
        self.position = None;
        self.stash.clear();
    }

    fn older(&mut self, current: &str) -> Option<&str> {
        let step = match self.position {
            None if self.entries.is_empty() => return None,
            None => {
                self.stash = current.to_string();
                0
            }
            Some(step) if step + 1 < self.entries.len() => step + 1,
            Some(_) => return None,
        };
        self.position = Some(step);
        self.entries.iter().rev().nth(step).map(String::as_str)
    }

    fn newer(&mut self) -> Option<String> {
        match self.position? {
            0 => {
                self.position = None;
                Some(std::mem::take(&mut self.stash))
            }
            step => {
                self.position = Some(step - 1);
                self.entries.iter().rev().nth(step - 1).cloned()
            }
        }
    }
}

/// Editable line buffer. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    text: String,
    cursor: usize,
    history: InputHistory,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of the character at `pos` (or the end of the text).
    fn offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.cursor = self.len_chars();
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.offset(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Remove the character left of the cursor.
    pub fn backspace(&mut self) {
        if let Some(pos) = self.cursor.checked_sub(1) {
            let at = self.offset(pos);
            self.text.remove(at);
            self.cursor = pos;
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len_chars() {
            let at = self.offset(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len_chars());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len_chars();
    }

    /// Empty the line and return what it held. Non-blank text is kept for
    /// recall.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        let text = std::mem::take(&mut self.text);
        self.history.record(&text);
        text
    }

    /// Replace the line with the previous sent entry, if any.
    pub fn recall_previous(&mut self) {
        if let Some(entry) = self.history.older(&self.text) {
            let entry = entry.to_string();
            self.set_text(entry);
        }
    }

    /// Step forward through sent entries, ending at the unsent line.
    pub fn recall_next(&mut self) {
        if let Some(entry) = self.history.newer() {
            self.set_text(entry);
        }
    }

    /// Widget that draws this line.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            state: self,
            placeholder: None,
        }
    }
}

/// Renders a [`TextInputState`] as `> text` with a block cursor.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    state: &'a TextInputState,
    placeholder: Option<&'a str>,
}

impl<'a> TextInput<'a> {
    /// Dim hint shown while the line is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

const PROMPT: &str = "> ";

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let cursor_style = Styles::accent().add_modifier(Modifier::REVERSED);
        let mut spans = vec![Span::styled(PROMPT, Styles::accent())];

        if self.state.is_empty() {
            // cursor sits on the first placeholder character
            let hint = self.placeholder.unwrap_or(" ");
            let mut chars = hint.chars();
            let first = chars.next().map_or_else(|| " ".to_string(), String::from);
            spans.push(Span::styled(
                first,
                Styles::muted().add_modifier(Modifier::REVERSED),
            ));
            spans.push(Span::styled(chars.as_str().to_string(), Styles::muted()));
        } else {
            let text = self.state.content();
            let cursor = self.state.cursor();
            let before: String = text.chars().take(cursor).collect();
            // Keep the cursor cell on screen by dropping leading characters.
            let room = usize::from(area.width).saturating_sub(visual_width(PROMPT) + 1);
            let before = scroll_to_fit(&before, room);
            let under = text
                .chars()
                .nth(cursor)
                .map_or_else(|| " ".to_string(), String::from);
            let after: String = text.chars().skip(cursor + 1).collect();
            spans.push(Span::styled(before.to_string(), Styles::text()));
            spans.push(Span::styled(under, cursor_style));
            spans.push(Span::styled(after, Styles::text()));
        }

        Paragraph::new(Line::from(spans))
            .style(Styles::text())
            .render(area, buf);
    }
}

/// The longest suffix of `before` that fits in `room` cells.
fn scroll_to_fit(before: &str, room: usize) -> &str {
    let mut rest = before;
    let mut chars = before.chars();
    while visual_width(rest) > room {
        if chars.next().is_none() {
            break;
        }
        rest = chars.as_str();
    }
    rest
}
