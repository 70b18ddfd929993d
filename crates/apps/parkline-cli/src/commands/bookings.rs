//! Booking list command.

use parkline_types::{ListingId, UserId};

use crate::config::CliConfig;
use crate::context::MarketContext;
use crate::error::{CliError, CliResult};
use crate::output::{BookingListOutput, OutputFormat, Render};

/// Execute the bookings command.
///
/// Shows a guest's bookings, or the bookings on a host's listings
/// (optionally a single listing).
pub fn bookings(
    config: CliConfig,
    format: OutputFormat,
    user: Option<String>,
    host: Option<String>,
    listing: Option<String>,
) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;

    let bookings = match (user, host, listing) {
        (Some(user), None, None) => ctx.market.bookings_for_user(&UserId::new(user))?,
        (None, Some(host), None) => ctx.market.bookings_for_host(&UserId::new(host))?,
        (None, Some(host), Some(listing)) => ctx
            .market
            .bookings_for_listing(&UserId::new(host), &ListingId::new(listing))?,
        _ => {
            return Err(CliError::user(
                "Pass --user, or --host with an optional --listing",
            ))
        }
    };
    let total = bookings.len();

    let output = BookingListOutput {
        bookings,
        total,
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}
