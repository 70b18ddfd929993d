//! Output formatting for CLI.

use colored::Colorize;
use parkline_ops::{CheckoutHandle, ListingView, SessionVerification};
use parkline_types::{Booking, ListingStatus, PaymentStatus, SessionId, Timestamp};
use serde::Serialize;

use crate::config::{format_price, format_time};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for init command.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub config_path: String,
    pub database: String,
    pub provider: String,
}

impl Render for InitOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {}\n{} {}\n{} {}",
            "Configuration saved to:".green().bold(),
            self.config_path,
            "Database:".bold(),
            self.database,
            "Payment provider:".bold(),
            self.provider
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for a single listing (publish, show, deactivate, reprice).
#[derive(Debug, Serialize)]
pub struct ListingOutput {
    #[serde(skip)]
    pub heading: &'static str,
    #[serde(flatten)]
    pub view: ListingView,
    #[serde(skip)]
    pub currency: String,
}

impl Render for ListingOutput {
    fn render_human(&self) -> String {
        let l = &self.view.listing;
        let mut lines = vec![
            format!("{} {}", self.heading.green().bold(), l.id),
            format!("{} \"{}\"", "Title:".bold(), l.title),
        ];
        if !l.event_name.is_empty() {
            lines.push(format!("{} {}", "Event:".bold(), l.event_name));
        }
        lines.extend([
            format!("{} {}", "Spot:".bold(), l.spot_id),
            format!("{} {}", "Host:".bold(), l.host_id),
            format!("{} {}", "Price:".bold(), format_price(l.price, &self.currency)),
            format!(
                "{} {}/{} booked, {} remaining",
                "Spaces:".bold(),
                l.booked_spaces,
                l.spaces_available,
                self.view.remaining
            ),
            format!("{} {}", "Status:".bold(), colored_status(l.status)),
            format!(
                "{} {} to {}",
                "When:".bold(),
                format_time(l.window.start),
                format_time(l.window.end)
            ),
        ]);
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for listing list command.
#[derive(Debug, Serialize)]
pub struct ListingListOutput {
    pub listings: Vec<ListingView>,
    pub total: usize,
    #[serde(skip)]
    pub currency: String,
}

impl Render for ListingListOutput {
    fn render_human(&self) -> String {
        if self.listings.is_empty() {
            return "No listings found.".dimmed().to_string();
        }

        let mut lines = vec![format!("{} ({})", "Listings".bold(), self.total)];
        for view in &self.listings {
            let l = &view.listing;
            lines.push(format!(
                "  {}  {}  {}  {}/{}  {}  {}",
                l.id,
                format_price(l.price, &self.currency),
                colored_status(l.status),
                l.booked_spaces,
                l.spaces_available,
                format_time(l.window.start),
                l.title
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for checkout command.
#[derive(Debug, Serialize)]
pub struct CheckoutOutput {
    #[serde(flatten)]
    pub handle: CheckoutHandle,
    #[serde(skip)]
    pub currency: String,
}

impl Render for CheckoutOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {}\n{} {}\n{} {}",
            "Checkout session:".green().bold(),
            self.handle.session_id,
            "Amount:".bold(),
            format_price(self.handle.price_snapshot, &self.currency),
            "Pay at:".bold(),
            self.handle.redirect_url.underline()
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for verify command.
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    #[serde(flatten)]
    pub verification: SessionVerification,
    #[serde(skip)]
    pub currency: String,
}

impl Render for VerifyOutput {
    fn render_human(&self) -> String {
        let v = &self.verification;
        let status = match v.status {
            PaymentStatus::Paid => v.status.to_string().green(),
            PaymentStatus::Unpaid => v.status.to_string().yellow(),
            _ => v.status.to_string().red(),
        };
        let mut lines = vec![
            format!("{} {}", "Session:".bold(), v.session_id),
            format!("{} {}", "Payment:".bold(), status),
            format!("{} {}", "Listing:".bold(), v.listing_id),
        ];
        if let Some(total) = v.amount_total {
            lines.push(format!(
                "{} {}",
                "Amount:".bold(),
                format_price(total, &self.currency)
            ));
        }
        match &v.booking_id {
            Some(id) => lines.push(format!("{} {}", "Booking:".bold(), id)),
            None if v.paid => lines.push(format!(
                "{}",
                "Paid but not yet confirmed. Run 'parkline confirm'.".cyan()
            )),
            None => {}
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for confirm command.
#[derive(Debug, Serialize)]
pub struct BookingOutput {
    #[serde(flatten)]
    pub booking: Booking,
    pub payment_id: SessionId,
    pub start: Timestamp,
    pub end: Timestamp,
    #[serde(skip)]
    pub currency: String,
}

impl BookingOutput {
    pub fn new(booking: Booking, currency: impl Into<String>) -> Self {
        Self {
            payment_id: booking.payment_id().clone(),
            start: booking.window.start,
            end: booking.window.end,
            booking,
            currency: currency.into(),
        }
    }
}

impl Render for BookingOutput {
    fn render_human(&self) -> String {
        let b = &self.booking;
        [
            format!("{} {}", "Booking confirmed:".green().bold(), b.id),
            format!("{} {}", "Listing:".bold(), b.listing_id),
            format!("{} {}", "Spot:".bold(), b.spot_id),
            format!("{} {}", "Guest:".bold(), b.user_id),
            format!(
                "{} {}",
                "Paid:".bold(),
                format_price(b.total_price, &self.currency)
            ),
            format!("{} {}", "Payment:".bold(), self.payment_id),
            format!(
                "{} {} to {}",
                "When:".bold(),
                format_time(b.window.start),
                format_time(b.window.end)
            ),
        ]
        .join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for bookings command.
#[derive(Debug, Serialize)]
pub struct BookingListOutput {
    pub bookings: Vec<Booking>,
    pub total: usize,
    #[serde(skip)]
    pub currency: String,
}

impl Render for BookingListOutput {
    fn render_human(&self) -> String {
        if self.bookings.is_empty() {
            return "No bookings found.".dimmed().to_string();
        }

        let mut lines = vec![format!("{} ({})", "Bookings".bold(), self.total)];
        for b in &self.bookings {
            lines.push(format!(
                "  {}  {}  {}  {}  {}",
                b.id,
                b.listing_id,
                b.user_id,
                format_price(b.total_price, &self.currency),
                format_time(b.window.start)
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for pay command.
#[derive(Debug, Serialize)]
pub struct PayOutput {
    pub session_id: String,
    pub status: PaymentStatus,
}

impl Render for PayOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {} is now {}",
            "Session".green().bold(),
            self.session_id,
            self.status
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn colored_status(status: ListingStatus) -> colored::ColoredString {
    match status {
        ListingStatus::Active => status.to_string().green(),
        ListingStatus::Full => status.to_string().yellow(),
        _ => status.to_string().dimmed(),
    }
}
