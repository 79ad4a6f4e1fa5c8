//! Auth CLI commands.

use clap::{Parser, Subcommand};

/// Account commands.
#[derive(Debug, Parser)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Available auth actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FITSYNC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FITSYNC_PASSWORD", hide_env_values = true)]
        password: String,
        /// Display name; defaults to the email's local part.
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Sign out and forget cached accounts.
    Logout,
    /// Show the signed-in account.
    Whoami,
}
