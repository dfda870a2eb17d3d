//! Layout helpers for the duke TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Split the screen into tab bar, body, and status bar.
pub fn shell_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_layout_rows() {
        let (tabs, body, status) = shell_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(tabs.height, 1);
        assert_eq!(status.height, 1);
        assert_eq!(body.height, 22);
        assert_eq!(status.y, 23);
    }

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_fixed(40, 4, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 3);
    }
}
