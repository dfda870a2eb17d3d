//! Conversation view controller.
//!
//! Owns the message log, the uncommitted draft, and the single-flight
//! pending flag. A turn is split in two so that a front-end can observe the
//! intermediate state:
//!
//! 1. [`ConversationController::submit`] appends the user message, clears the
//!    draft, marks the controller pending and hands back a [`PendingTurn`].
//! 2. [`ConversationController::settle`] appends the bot reply (or the
//!    fallback) and returns the controller to idle.
//!
//! [`ConversationController::exchange`] runs both halves against a
//! [`ReplyService`] for callers that don't need to interleave.

use crate::config::Config;
use crate::conversation::Conversation;
use crate::message::{MessageId, MessageStatus, Sender};
use crate::reply::{ReplyError, ReplyRequest, ReplyService};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bot text appended when a reply request fails for any reason.
pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, I couldn't reach Duke. Please try again.";

/// Token identifying one submission-to-settlement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controller state for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Ready to accept a submission.
    Idle,
    /// A reply request is in flight.
    AwaitingReply(TurnId),
}

/// An accepted submission whose reply has not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Token to pass back to [`ConversationController::settle`].
    pub turn: TurnId,
    /// Request to send to the reply service.
    pub request: ReplyRequest,
}

/// State change notifications, published after each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A message was appended to the log.
    MessageAppended(MessageId),
    /// A submission was accepted and a reply is pending.
    TurnStarted(TurnId),
    /// The pending reply settled (successfully or not).
    TurnSettled(TurnId),
}

/// Controller for a single conversation session.
#[derive(Debug)]
pub struct ConversationController {
    session_id: Uuid,
    conversation: Conversation,
    draft: String,
    state: TurnState,
    next_turn: u64,
    fallback_reply: String,
    context: Option<String>,
    subscribers: Vec<mpsc::UnboundedSender<ConversationEvent>>,
}

impl ConversationController {
    /// Create a controller configured from `config`.
    pub fn new(config: &Config) -> Self {
        let session_id = Uuid::new_v4();
        info!(session = %session_id, "conversation session started");
        Self {
            session_id,
            conversation: Conversation::with_greeting(config.greeting.clone()),
            draft: String::new(),
            state: TurnState::Idle,
            next_turn: 1,
            fallback_reply: config.fallback_reply.clone(),
            context: config.context.clone(),
            subscribers: Vec::new(),
        }
    }

    /// Unique id of this session (for log correlation).
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The message log.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current uncommitted input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a reply request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, TurnState::AwaitingReply(_))
    }

    /// Replace the draft. Allowed at any time, including while pending.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Register a subscriber for state change events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Accept a submission.
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// reply is already pending. The text is taken as given, not read from
    /// the draft.
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            return None;
        }
        if let TurnState::AwaitingReply(turn) = self.state {
            debug!(session = %self.session_id, %turn, "submit rejected: reply pending");
            return None;
        }

        let id = self
            .conversation
            .push(Sender::User, text, MessageStatus::Sent);
        self.draft.clear();

        let turn = TurnId(self.next_turn);
        self.next_turn += 1;
        self.state = TurnState::AwaitingReply(turn);
        debug!(session = %self.session_id, %turn, "turn started");

        self.publish(ConversationEvent::MessageAppended(id));
        self.publish(ConversationEvent::TurnStarted(turn));

        Some(PendingTurn {
            turn,
            request: ReplyRequest::new(text).with_context(self.context.clone()),
        })
    }

    /// Apply the outcome of a pending turn.
    ///
    /// A settlement for a turn other than the outstanding one is dropped.
    /// Returns whether the settlement was applied.
    pub fn settle(&mut self, turn: TurnId, outcome: Result<String, ReplyError>) -> bool {
        if self.state != TurnState::AwaitingReply(turn) {
            debug!(session = %self.session_id, %turn, "ignoring stale settlement");
            return false;
        }

        let text = match outcome {
            Ok(reply) => {
                debug!(session = %self.session_id, %turn, "reply received");
                reply
            }
            Err(e) => {
                warn!(
                    session = %self.session_id,
                    %turn,
                    kind = %e.kind(),
                    error = %e,
                    "reply request failed"
                );
                self.fallback_reply.clone()
            }
        };

        let id = self
            .conversation
            .push(Sender::Bot, text, MessageStatus::Delivered);
        self.state = TurnState::Idle;

        self.publish(ConversationEvent::MessageAppended(id));
        self.publish(ConversationEvent::TurnSettled(turn));
        true
    }

    /// Run a complete turn against `service`.
    ///
    /// Returns `false` if the submission was rejected.
    pub async fn exchange(&mut self, service: &dyn ReplyService, text: &str) -> bool {
        let Some(pending) = self.submit(text) else {
            return false;
        };
        let outcome = service.reply(&pending.request).await;
        self.settle(pending.turn, outcome)
    }

    fn publish(&mut self, event: ConversationEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
