//! Command-line interface for the Parkline marketplace.
//!
//! This crate provides the `parkline` binary. It includes commands for:
//!
//! - **Setup**: write a configuration file and create the database
//! - **Hosts**: publish, list, reprice and deactivate listings
//! - **Guests**: open a checkout session, verify payment, confirm a booking
//! - **Bookings**: list bookings by guest, host or listing
//!
//! # Quick Start
//!
//! ```bash
//! parkline init
//!
//! parkline listing publish --spot spot_1 --host host_1 --title "Stadium lot" \
//!     --price 12.50 --spaces 40 \
//!     --start 2026-01-01T18:00:00Z --end 2026-01-01T22:00:00Z
//!
//! parkline checkout lst_... --user guest_1
//! parkline pay cs_mock_...            # mock provider only
//! parkline confirm cs_mock_... --user guest_1
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format` for output control:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `config.toml` in the data directory
//! (`PARKLINE_DATA_DIR` if set). Override with `--config`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

// Re-export main types
pub use cli::{Cli, Commands, ListingCommands, OutputFormatArg};
pub use config::CliConfig;
pub use context::MarketContext;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
