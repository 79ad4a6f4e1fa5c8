//! CLI command definitions.

pub mod auth;
pub mod bookings;
pub mod classes;
pub mod groups;
pub mod messages;
pub mod social;

use clap::{Parser, Subcommand, ValueEnum};

/// Offline-first client for the fitness service.
#[derive(Debug, Parser)]
#[command(name = "fitsync")]
#[command(version, about = "Offline-first client for the fitness service", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "FITSYNC_API_URL", default_value = "http://localhost:8080/api")]
    pub base_url: String,

    /// Local cache database.
    #[arg(long, env = "FITSYNC_STORE_PATH", default_value = "fitsync.db")]
    pub store_path: String,

    /// File holding the signed-in user's tokens.
    #[arg(long, env = "FITSYNC_TOKEN_PATH", default_value = "fitsync-tokens.json")]
    pub token_path: String,

    /// Read from the local cache only; never touch the network.
    #[arg(long, global = true)]
    pub cached: bool,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, show the current account.
    Auth(auth::AuthCommand),
    /// Browse the class catalogue and its reviews.
    Classes(classes::ClassesCommand),
    /// Manage your class bookings.
    Bookings(bookings::BookingsCommand),
    /// Groups, members and group activities.
    Groups(groups::GroupsCommand),
    /// Conversations and messages.
    Messages(messages::MessagesCommand),
    /// Activity feed, likes, comments and follows.
    Social(social::SocialCommand),
}
