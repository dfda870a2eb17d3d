//! duke-engine: Headless conversation engine for the Duke HR assistant
//!
//! This crate provides the UI-agnostic core of the duke client, including:
//! - Message and conversation types
//! - The conversation controller (draft, single-flight submit, settlement)
//! - The reply service trait and its HTTP implementation
//! - Background dispatch of reply requests
//! - Configuration

pub mod config;
pub mod controller;
pub mod conversation;
pub mod dispatch;
pub mod message;
pub mod reply;

// Re-export commonly used types
pub use config::{Config, ConfigError, ENDPOINT_ENV};
pub use controller::{
    ConversationController, ConversationEvent, PendingTurn, TurnId, TurnState,
    DEFAULT_FALLBACK_REPLY,
};
pub use conversation::{Conversation, DEFAULT_GREETING};
pub use dispatch::{ReplyDispatcher, Settlement};
pub use message::{format_time, Message, MessageId, MessageStatus, Sender};
pub use reply::{
    FailureKind, HealthStatus, HttpReplyService, ReplyError, ReplyRequest, ReplyService,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
