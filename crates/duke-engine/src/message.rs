//! Message types for Duke conversations.
//!
//! A [`Message`] is immutable once created: sender, text, status and
//! timestamp are all fixed at construction.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a message, unique within one conversation.
///
/// Allocated from a monotonic counter, so two messages created in the same
/// clock tick still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Create an id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the client.
    User,
    /// The reply service (or the client speaking on its behalf).
    Bot,
}

/// Display status of a message.
///
/// No acknowledgement protocol exists, so this never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Checkmark glyph shown next to user messages.
    pub fn glyph(self) -> &'static str {
        match self {
            MessageStatus::Read => "✓✓",
            MessageStatus::Sent | MessageStatus::Delivered => "✓",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id within the conversation.
    pub id: MessageId,
    /// Literal content.
    pub text: String,
    /// Author.
    pub sender: Sender,
    /// Creation time (display only; ordering is insertion order).
    pub timestamp: DateTime<Utc>,
    /// Display status.
    pub status: MessageStatus,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(
        id: MessageId,
        sender: Sender,
        text: impl Into<String>,
        status: MessageStatus,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            status,
        }
    }

    /// Whether this message was typed by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Local wall-clock time of the message, e.g. `09:05 AM`.
    pub fn display_time(&self) -> String {
        format_time(&self.timestamp.with_timezone(&Local))
    }
}

/// Format a time as a 12-hour clock with two-digit hour and minute.
pub fn format_time<Tz: chrono::TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%I:%M %p").to_string()
}
