//! Application state and update logic for the duke TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use duke_engine::{
    Config, ConversationController, ConversationEvent, ReplyDispatcher, ReplyService,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Lines moved per page scroll.
const PAGE_SCROLL: usize = 10;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Tasks,
    Schedule,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: [Tab; 3] = [Tab::Chat, Tab::Tasks, Tab::Schedule];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Tasks => "Tasks",
            Tab::Schedule => "Schedule",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Chat => 0,
            Tab::Tasks => 1,
            Tab::Schedule => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Current tab.
    pub tab: Tab,

    /// Display name of the assistant.
    pub assistant_name: String,

    /// Conversation state for the chat tab.
    pub controller: ConversationController,

    /// Chat input box.
    pub input_state: TextInputState,

    /// Transcript scroll offset, counted in lines up from the newest.
    pub scroll_from_bottom: usize,

    /// Tick counter for animations.
    pub tick: usize,

    dispatcher: ReplyDispatcher,
    conversation_events: mpsc::UnboundedReceiver<ConversationEvent>,
}

impl App {
    /// Create the app for `config`, sending replies through `service`.
    pub fn new(config: &Config, service: Arc<dyn ReplyService>) -> Self {
        let mut controller = ConversationController::new(config);
        let conversation_events = controller.subscribe();
        Self {
            should_quit: false,
            show_help: false,
            tab: Tab::default(),
            assistant_name: config.assistant_name.clone(),
            controller,
            input_state: TextInputState::new(),
            scroll_from_bottom: 0,
            tick: 0,
            dispatcher: ReplyDispatcher::new(service),
            conversation_events,
        }
    }

    /// Handle a navigation action.
    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            self.show_help = false;
            if action == Action::Quit {
                self.should_quit = true;
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Back => self.tab = Tab::Chat,
            Action::Up => self.scroll_up(1),
            Action::Down => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.scroll_down(PAGE_SCROLL),
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::Tab(i) => {
                if let Some(tab) = Tab::from_index(i) {
                    self.tab = tab;
                }
            }
            Action::None => {}
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        if self.tab == Tab::Chat {
            self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
        }
    }

    fn scroll_down(&mut self, lines: usize) {
        if self.tab == Tab::Chat {
            self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
        }
    }

    /// Push the input box content to the controller's draft.
    pub fn sync_draft(&mut self) {
        self.controller
            .update_draft(self.input_state.content().to_string());
    }

    /// Send the current input.
    ///
    /// Does nothing (and keeps the input) when the input is blank or a reply
    /// is still pending. Returns whether a request was started.
    pub fn send_draft(&mut self) -> bool {
        let Some(pending) = self.controller.submit(self.input_state.content()) else {
            return false;
        };
        self.input_state.take();
        self.sync_draft();
        debug!(turn = %pending.turn, "dispatching reply request");
        self.dispatcher.dispatch(pending);
        true
    }

    /// Apply finished reply requests and react to conversation changes.
    pub fn process_settlements(&mut self) {
        while let Some(settlement) = self.dispatcher.try_next() {
            self.controller.settle(settlement.turn, settlement.outcome);
        }

        while let Ok(event) = self.conversation_events.try_recv() {
            if let ConversationEvent::MessageAppended(_) = event {
                self.scroll_from_bottom = 0;
            }
        }
    }

    /// Update on tick (for animations and background work).
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.process_settlements();
    }

    /// Abort any outstanding reply request.
    pub fn shutdown(&mut self) {
        self.dispatcher.abort_all();
    }

    /// Wait for the next reply to arrive and apply it.
    #[cfg(test)]
    pub(crate) async fn settle_next(&mut self) {
        if let Some(settlement) = self.dispatcher.next().await {
            self.controller.settle(settlement.turn, settlement.outcome);
        }
        self.process_settlements();
    }
}
