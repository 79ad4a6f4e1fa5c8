//! Group CLI commands.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use fitsync_core::entities::RsvpStatus;

/// Group commands.
#[derive(Debug, Parser)]
pub struct GroupsCommand {
    #[command(subcommand)]
    pub action: GroupsAction,
}

/// RSVP answer, including withdrawing one.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RsvpChoice {
    Yes,
    No,
    Maybe,
    None,
}

impl From<RsvpChoice> for Option<RsvpStatus> {
    fn from(choice: RsvpChoice) -> Self {
        match choice {
            RsvpChoice::Yes => Some(RsvpStatus::Yes),
            RsvpChoice::No => Some(RsvpStatus::No),
            RsvpChoice::Maybe => Some(RsvpStatus::Maybe),
            RsvpChoice::None => None,
        }
    }
}

/// Available group actions.
#[derive(Debug, Subcommand)]
pub enum GroupsAction {
    /// List groups.
    List,
    /// Get group by ID.
    Get {
        /// Group ID.
        id: String,
    },
    /// Create a group.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        private: bool,
    },
    /// Join a group.
    Join {
        /// Group ID.
        id: String,
    },
    /// Leave a group.
    Leave {
        /// Group ID.
        id: String,
    },
    /// List a group's members.
    Members {
        /// Group ID.
        id: String,
    },
    /// List a group's activities.
    Activities {
        /// Group ID.
        id: String,
    },
    /// Schedule a group activity.
    Schedule {
        /// Group ID.
        group_id: String,
        #[arg(long)]
        title: String,
        /// Start time (RFC 3339).
        #[arg(long)]
        at: DateTime<Utc>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Answer a group activity invitation.
    Rsvp {
        /// Group activity ID.
        activity_id: String,
        answer: RsvpChoice,
    },
}
