//! Messaging CLI commands.

use clap::{Parser, Subcommand};

/// Messaging commands.
#[derive(Debug, Parser)]
pub struct MessagesCommand {
    #[command(subcommand)]
    pub action: MessagesAction,
}

/// Available messaging actions.
#[derive(Debug, Subcommand)]
pub enum MessagesAction {
    /// List conversations.
    Conversations,
    /// Start a conversation.
    Start {
        /// Participant user IDs.
        #[arg(required = true)]
        participants: Vec<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Show a conversation's latest messages.
    Show {
        /// Conversation ID.
        conversation_id: String,
        /// Number of messages (defaults to MESSAGE_WINDOW_SIZE).
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Send a message.
    Send {
        /// Conversation ID.
        conversation_id: String,
        content: String,
    },
    /// Mark a conversation read.
    Read {
        /// Conversation ID.
        conversation_id: String,
    },
    /// Stream realtime messaging events into the cache.
    Watch,
}
