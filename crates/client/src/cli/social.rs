//! Social CLI commands.

use clap::{Parser, Subcommand};

/// Social commands.
#[derive(Debug, Parser)]
pub struct SocialCommand {
    #[command(subcommand)]
    pub action: SocialAction,
}

/// Available social actions.
#[derive(Debug, Subcommand)]
pub enum SocialAction {
    /// Show the activity feed.
    Feed {
        /// Number of pages to load.
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Like or unlike an activity.
    Like {
        /// Activity ID.
        id: String,
    },
    /// List an activity's comments.
    Comments {
        /// Activity ID.
        id: String,
    },
    /// Comment on an activity.
    Comment {
        /// Activity ID.
        id: String,
        content: String,
    },
    /// Show a user's profile.
    Profile {
        /// User ID.
        user_id: String,
    },
    /// Follow or unfollow a user.
    Follow {
        /// User ID.
        user_id: String,
    },
}
