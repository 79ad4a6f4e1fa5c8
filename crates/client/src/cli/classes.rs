//! Class CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Class catalogue commands.
#[derive(Debug, Parser)]
pub struct ClassesCommand {
    #[command(subcommand)]
    pub action: ClassesAction,
}

/// Available class actions.
#[derive(Debug, Subcommand)]
pub enum ClassesAction {
    /// List classes with filters.
    List {
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Match name, instructor or description.
        #[arg(long)]
        search: Option<String>,
        /// Only classes on this day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Get class by ID.
    Get {
        /// Class ID.
        id: String,
    },
    /// List a class's reviews.
    Reviews {
        /// Class ID.
        class_id: String,
    },
    /// Review a class.
    Review {
        /// Class ID.
        class_id: String,
        /// Rating from 1 to 5.
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
}
