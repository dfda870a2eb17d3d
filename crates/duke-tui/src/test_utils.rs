//! Test utilities for duke-tui rendering and integration tests.

use crate::app::App;
use crate::screens::render_frame;
use async_trait::async_trait;
use duke_engine::{Config, ReplyError, ReplyRequest, ReplyService};
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::Arc;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Replies with `echo: <message>`.
pub struct EchoService;

#[async_trait]
impl ReplyService for EchoService {
    async fn reply(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        Ok(format!("echo: {}", request.message))
    }
}

/// Fails every request with a protocol error.
pub struct FailingService;

#[async_trait]
impl ReplyService for FailingService {
    async fn reply(&self, _request: &ReplyRequest) -> Result<String, ReplyError> {
        Err(ReplyError::Protocol { status: 503 })
    }
}

/// Create an app with the default config.
pub fn create_test_app(service: Arc<dyn ReplyService>) -> App {
    App::new(&Config::default(), service)
}

/// Convert a buffer to a string, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render the whole app at the default test size.
pub fn render_app_to_string(app: &App) -> String {
    render_app_to_string_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the whole app at a custom size.
pub fn render_app_to_string_sized(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_frame(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string_trims_rows() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 2, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\n\nWorld");
    }

    #[test]
    fn test_render_small_terminal_does_not_panic() {
        let app = create_test_app(Arc::new(EchoService));
        let screen = render_app_to_string_sized(&app, 20, 8);
        assert!(!screen.is_empty());
    }
}
