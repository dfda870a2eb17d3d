//! Chat screen: header, message transcript and input box.

use super::Screen;
use crate::app::App;
use crate::text::{truncate_to_width, visual_width, wrap_text};
use crate::ui::theme::{spinner_frame, Palette, Styles};
use duke_engine::Message;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::ops::Range;

/// Bubbles take at most this share of the transcript width.
const BUBBLE_WIDTH_PERCENT: usize = 70;

/// Input box placeholder.
pub const INPUT_PLACEHOLDER: &str = "Type a message... (e.g., 'I'm sick! What shall I do?')";

/// The chat tab.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(app, chunks[0], buf);
        render_transcript(app, chunks[1], buf);
        render_input(app, chunks[2], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let name_width = usize::from(area.width).saturating_sub(12);
    let line = Line::from(vec![
        Span::styled(" ", Styles::text()),
        Span::styled(
            truncate_to_width(&app.assistant_name, name_width),
            Styles::accent_bold(),
        ),
        Span::styled("  ● ", Styles::accent()),
        Span::styled("Online", Styles::muted()),
    ]);

    Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Styles::frame()),
        )
        .style(Styles::text())
        .render(area, buf);
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = transcript_lines(app, usize::from(area.width));

    let window = visible_window(lines.len(), usize::from(area.height), app.scroll_from_bottom);
    lines.truncate(window.end);
    lines.drain(..window.start);

    Paragraph::new(lines)
        .style(Styles::text())
        .render(area, buf);
}

/// Range of transcript lines shown in `height` rows, `scroll_from_bottom`
/// lines up from the newest.
fn visible_window(len: usize, height: usize, scroll_from_bottom: usize) -> Range<usize> {
    let max_scroll = len.saturating_sub(height);
    let top = max_scroll - scroll_from_bottom.min(max_scroll);
    top..len.min(top + height)
}

/// Build the transcript as pre-wrapped lines, oldest first.
fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    // one column of margin on each side
    let inner = width.saturating_sub(2);
    let bubble_max = (inner * BUBBLE_WIDTH_PERCENT / 100).max(4);

    let mut lines = Vec::new();
    for message in app.controller.conversation().messages() {
        push_bubble(&mut lines, message, bubble_max);
        lines.push(Line::default());
    }

    if app.controller.is_pending() {
        lines.push(Line::from(vec![
            Span::styled(" ", Styles::text()),
            Span::styled(spinner_frame(app.tick), Styles::accent()),
            Span::styled(
                format!(" {} is thinking...", app.assistant_name),
                Styles::muted().add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines
}

fn push_bubble(lines: &mut Vec<Line<'static>>, message: &Message, bubble_max: usize) {
    let wrapped = wrap_text(&message.text, bubble_max.saturating_sub(2));
    let body_width = wrapped.iter().map(|l| visual_width(l)).max().unwrap_or(0);

    let (style, alignment) = if message.is_user() {
        (Styles::user_bubble(), Alignment::Right)
    } else {
        (Styles::bot_bubble(), Alignment::Left)
    };

    for text in wrapped {
        let pad = body_width - visual_width(&text);
        let cell = format!(" {text}{} ", " ".repeat(pad));
        lines.push(with_margin(Span::styled(cell, style), alignment));
    }

    let mut meta = vec![Span::styled(message.display_time(), Styles::muted())];
    if message.is_user() {
        meta.push(Span::styled(" ", Styles::muted()));
        meta.push(Span::styled(message.status.glyph(), Styles::receipt()));
    }
    let mut meta_line = Line::from(meta).alignment(alignment);
    match alignment {
        Alignment::Right => meta_line.spans.push(Span::styled(" ", Styles::text())),
        _ => meta_line.spans.insert(0, Span::styled(" ", Styles::text())),
    }
    lines.push(meta_line);
}

fn with_margin(span: Span<'static>, alignment: Alignment) -> Line<'static> {
    let margin = Span::styled(" ", Styles::text());
    let spans = match alignment {
        Alignment::Right => vec![span, margin],
        _ => vec![margin, span],
    };
    Line::from(spans).alignment(alignment)
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::frame_focused())
        .style(Styles::text().bg(Palette::SURFACE));
    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .placeholder(INPUT_PLACEHOLDER)
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_app_to_string, EchoService};
    use duke_engine::DEFAULT_GREETING;
    use std::sync::Arc;

    #[test]
    fn test_chat_shows_header_greeting_and_placeholder() {
        let app = create_test_app(Arc::new(EchoService));
        let screen = render_app_to_string(&app);

        assert!(screen.contains("Duke  ● Online"));
        assert!(screen.contains("Hello! I'm Duke"));
        assert!(screen.contains("> Type a message..."));
    }

    #[test]
    fn test_bot_bubble_left_user_bubble_right() {
        let app = create_test_app(Arc::new(EchoService));
        let lines = transcript_lines(&app, 80);

        assert_eq!(lines[0].alignment, Some(Alignment::Left));

        let mut app = app;
        app.controller.submit("hi");
        let lines = transcript_lines(&app, 80);
        let user_line = lines
            .iter()
            .find(|l| l.spans.iter().any(|s| s.content == " hi "))
            .map(|l| l.alignment);
        assert_eq!(user_line, Some(Some(Alignment::Right)));
    }

    #[test]
    fn test_bubbles_wrap_within_seventy_percent() {
        let app = create_test_app(Arc::new(EchoService));
        let width = 40;
        let limit = (width - 2) * BUBBLE_WIDTH_PERCENT / 100;

        for line in transcript_lines(&app, width) {
            let bubble = line.spans.iter().find(|s| s.style == Styles::bot_bubble());
            if let Some(span) = bubble {
                assert!(visual_width(&span.content) <= limit, "{:?}", span.content);
            }
        }
        assert!(DEFAULT_GREETING.len() > limit);
    }

    #[test]
    fn test_user_message_has_delivery_glyph() {
        let mut app = create_test_app(Arc::new(EchoService));
        app.controller.submit("Where is my payslip?");
        let screen = render_app_to_string(&app);

        assert!(screen.contains("Where is my payslip?"));
        assert!(screen.contains("✓"));
    }

    #[test]
    fn test_thinking_indicator_while_pending() {
        let mut app = create_test_app(Arc::new(EchoService));
        assert!(!render_app_to_string(&app).contains("is thinking"));

        app.controller.submit("hello");
        let screen = render_app_to_string(&app);
        assert!(screen.contains("Duke is thinking..."));
        assert!(screen.contains("Waiting for reply"));
    }

    #[test]
    fn test_transcript_sticks_to_newest() {
        let mut app = create_test_app(Arc::new(EchoService));
        for i in 0..12 {
            let pending = app
                .controller
                .submit(&format!("message number {i}"))
                .unwrap();
            app.controller.settle(pending.turn, Ok(format!("reply {i}")));
        }

        let screen = render_app_to_string(&app);
        assert!(screen.contains("reply 11"));
        assert!(!screen.contains("message number 0 "));

        app.scroll_from_bottom = usize::MAX;
        let screen = render_app_to_string(&app);
        assert!(screen.contains("Hello! I'm Duke"));
        assert!(!screen.contains("reply 11"));
    }

    #[test]
    fn test_visible_window_past_u16_range() {
        let len = 200_000;
        assert_eq!(visible_window(len, 10, 0), len - 10..len);
        assert_eq!(visible_window(len, 10, 5), len - 15..len - 5);
        assert_eq!(visible_window(len, 10, usize::MAX), 0..10);
        assert_eq!(visible_window(3, 10, 0), 0..3);
    }
}
