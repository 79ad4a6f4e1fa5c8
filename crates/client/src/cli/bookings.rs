//! Booking CLI commands.

use clap::{Parser, Subcommand};

use fitsync_core::entities::BookingStatus;

/// Booking management commands.
#[derive(Debug, Parser)]
pub struct BookingsCommand {
    #[command(subcommand)]
    pub action: BookingsAction,
}

/// Available booking actions.
#[derive(Debug, Subcommand)]
pub enum BookingsAction {
    /// List your bookings.
    List {
        /// Filter by status (confirmed, attended, cancelled, missed).
        #[arg(long)]
        status: Option<BookingStatus>,
    },
    /// Get booking by ID.
    Get {
        /// Booking ID.
        id: String,
    },
    /// Book a class.
    Create {
        /// Class ID.
        class_id: String,
        /// Remind this many minutes before the class.
        #[arg(long)]
        remind: Option<u32>,
    },
    /// Cancel a booking.
    Cancel {
        /// Booking ID.
        id: String,
    },
    /// Mark a booking as attended.
    Attend {
        /// Booking ID.
        id: String,
    },
    /// Change a booking's reminder.
    Reminder {
        /// Booking ID.
        id: String,
        /// Minutes before the class; omit to turn the reminder off.
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Delete a booking.
    Delete {
        /// Booking ID.
        id: String,
    },
}
