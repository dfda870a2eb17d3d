//! duke-tui: terminal front-end for the duke HR assistant
//!
//! This crate provides the interactive layer on top of `duke-engine`:
//! - Chat tab with message bubbles and a single-line input
//! - Placeholder Tasks and Schedule tabs
//! - Shared widgets (tab bar, status bar, text input)

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod text;
mod ui;

pub use app::{App, Tab};
pub use duke_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use duke_engine::{Config, ReplyService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// Event loop tick, also the spinner frame rate.
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit (including on error).
pub async fn run_tui(
    config: &Config,
    service: Arc<dyn ReplyService>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, service);
    info!(session = %app.controller.session_id(), endpoint = %config.endpoint, "tui started");

    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    app.shutdown();
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::render_frame(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !(app.tab == Tab::Chat && !app.show_help && handle_chat_key(app, key)) {
                        app.handle_action(event::key_to_action(key));
                    }
                }
                Event::Paste(text) => {
                    if app.tab == Tab::Chat {
                        app.input_state.insert_str(&text);
                        app.sync_draft();
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                    MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                    _ => {}
                },
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {}
            }
        }

        app.process_settlements();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Route a key to the chat input. Returns false for keys the input does
/// not use, which then go through [`event::key_to_action`].
fn handle_chat_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    if key.code == KeyCode::Enter {
        app.send_draft();
        return true;
    }

    let input = &mut app.input_state;
    match key.code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Up => input.recall_previous(),
        KeyCode::Down => input.recall_next(),
        _ => return false,
    }
    app.sync_draft();
    true
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
