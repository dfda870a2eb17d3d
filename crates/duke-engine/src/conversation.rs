//! Append-only conversation log.

use crate::message::{Message, MessageId, MessageStatus, Sender};
use serde::Serialize;

/// Greeting every new conversation starts with.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm Duke, your personal HR assistant. How can I help you today?";

/// An insertion-ordered, append-only sequence of messages.
///
/// The only mutation is [`Conversation::push`]; there is no way to remove,
/// reorder, or edit a message once it is in the log.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    #[serde(skip)]
    next_id: u64,
}

impl Conversation {
    /// Create a conversation seeded with a single bot greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(Sender::Bot, greeting, MessageStatus::Read);
        conversation
    }

    /// Append a new message and return its id.
    pub fn push(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        status: MessageStatus,
    ) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        self.messages.push(Message::new(id, sender, text, status));
        id
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, greeting included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the greeting is present from creation.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Look up a message by id.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}
