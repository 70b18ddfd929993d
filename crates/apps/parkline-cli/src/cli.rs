//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Parkline marketplace CLI.
#[derive(Parser, Debug)]
#[command(name = "parkline")]
#[command(author = "Parkline Contributors")]
#[command(version)]
#[command(about = "Command-line interface for the Parkline event parking marketplace")]
#[command(
    long_about = "Parkline lets hosts list parking spaces for events and guests book them through a hosted payment page.\n\nRun 'parkline init' to get started."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PARKLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the configured display format).
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormatArg>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // Setup
    // =========================================================================
    /// Write a default configuration file and create the database.
    Init {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },

    // =========================================================================
    // Hosts
    // =========================================================================
    /// Publish and manage listings.
    Listing {
        #[command(subcommand)]
        command: ListingCommands,
    },

    // =========================================================================
    // Guests
    // =========================================================================
    /// Open a checkout session for one space on a listing.
    ///
    /// Prints the session id and the payment page URL.
    Checkout {
        /// Listing to book.
        listing: String,

        /// Guest making the booking.
        #[arg(short, long)]
        user: String,
    },

    /// Show a session's payment state without booking anything.
    Verify {
        /// Checkout session id.
        session: String,
    },

    /// Confirm a paid session and record the booking.
    ///
    /// Safe to repeat: confirming the same session again returns the
    /// booking already recorded.
    Confirm {
        /// Checkout session id.
        session: String,

        /// Guest who opened the session.
        #[arg(short, long)]
        user: String,
    },

    /// List bookings for a guest, or for a host's listings.
    Bookings {
        /// Guest whose bookings to show.
        #[arg(short, long, conflicts_with = "host", required_unless_present = "host")]
        user: Option<String>,

        /// Host whose listings' bookings to show.
        #[arg(long)]
        host: Option<String>,

        /// Restrict to one of the host's listings.
        #[arg(short, long, requires = "host")]
        listing: Option<String>,
    },

    /// Simulate the guest paying (mock provider only).
    Pay {
        /// Checkout session id.
        session: String,

        /// Expire the session instead of paying it.
        #[arg(long)]
        expire: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: CompletionShell,
    },
}

/// Listing subcommands.
#[derive(Subcommand, Debug)]
pub enum ListingCommands {
    /// Publish a new listing.
    Publish {
        /// Parking spot the listing is for.
        #[arg(long)]
        spot: String,

        /// Host publishing the listing.
        #[arg(long)]
        host: String,

        /// Listing title.
        #[arg(short, long)]
        title: String,

        /// Event name shown to guests.
        #[arg(short, long, default_value = "")]
        event: String,

        /// Price per space, e.g. 12.50.
        #[arg(short, long)]
        price: String,

        /// Number of spaces offered.
        #[arg(short, long)]
        spaces: u32,

        /// Event start (RFC 3339).
        #[arg(long)]
        start: String,

        /// Event end (RFC 3339).
        #[arg(long)]
        end: String,
    },

    /// Show one listing.
    Show {
        /// Listing id.
        id: String,
    },

    /// List listings.
    List {
        /// Filter by spot.
        #[arg(long)]
        spot: Option<String>,

        /// Filter by host.
        #[arg(long)]
        host: Option<String>,

        /// Only listings still accepting checkouts.
        #[arg(short, long)]
        active: bool,

        /// Maximum results to show (defaults to the configured limit).
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Stop offering a listing. Existing bookings are kept.
    Deactivate {
        /// Listing id.
        id: String,

        /// Host that owns the listing.
        #[arg(long)]
        host: String,
    },

    /// Change a listing's price for future checkouts.
    Reprice {
        /// Listing id.
        id: String,

        /// Host that owns the listing.
        #[arg(long)]
        host: String,

        /// New price per space, e.g. 15.00.
        #[arg(short, long)]
        price: String,
    },
}

/// Shells supported by the completions command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
