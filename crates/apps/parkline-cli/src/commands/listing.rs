//! Listing management commands.

use parkline_ops::NewListing;
use parkline_store::ListingFilter;
use parkline_types::{EventWindow, ListingId, SpotId, UserId};

use crate::config::{parse_price, parse_time, CliConfig};
use crate::context::MarketContext;
use crate::error::CliResult;
use crate::output::{ListingListOutput, ListingOutput, OutputFormat, Render};

/// Arguments for `listing publish`.
#[derive(Debug, Clone)]
pub struct PublishArgs {
    pub spot: String,
    pub host: String,
    pub title: String,
    pub event: String,
    pub price: String,
    pub spaces: u32,
    pub start: String,
    pub end: String,
}

/// Execute the listing publish command.
pub fn publish_listing(
    config: CliConfig,
    format: OutputFormat,
    args: PublishArgs,
) -> CliResult<String> {
    let price = parse_price(&args.price)?;
    let window = EventWindow::new(parse_time(&args.start)?, parse_time(&args.end)?);

    let ctx = MarketContext::open(config)?;
    let listing = ctx.market.publish_listing(NewListing {
        spot_id: SpotId::new(args.spot),
        host_id: UserId::new(args.host),
        title: args.title,
        event_name: args.event,
        price,
        spaces: args.spaces,
        window,
    })?;

    let output = ListingOutput {
        heading: "Published:",
        view: listing.into(),
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}

/// Execute the listing show command.
pub fn show_listing(config: CliConfig, format: OutputFormat, id: &str) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;
    let view = ctx.market.listing_view(&ListingId::new(id))?;

    let output = ListingOutput {
        heading: "Listing:",
        view,
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}

/// Execute the listing list command.
pub fn list_listings(
    config: CliConfig,
    format: OutputFormat,
    spot: Option<String>,
    host: Option<String>,
    active: bool,
    limit: Option<u32>,
) -> CliResult<String> {
    let limit = limit.unwrap_or(config.display.list_limit);
    let ctx = MarketContext::open(config)?;

    let mut filter = ListingFilter::new().limit(limit);
    if let Some(spot) = spot {
        filter = filter.with_spot(SpotId::new(spot));
    }
    if let Some(host) = host {
        filter = filter.with_host(UserId::new(host));
    }
    if active {
        filter = filter.active();
    }

    let listings = ctx.market.list_listings(&filter)?;
    let total = listings.len();

    let output = ListingListOutput {
        listings,
        total,
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}

/// Execute the listing deactivate command.
pub fn deactivate_listing(
    config: CliConfig,
    format: OutputFormat,
    id: &str,
    host: &str,
) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;
    let listing = ctx
        .market
        .deactivate_listing(&UserId::new(host), &ListingId::new(id))?;

    let output = ListingOutput {
        heading: "Deactivated:",
        view: listing.into(),
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}

/// Execute the listing reprice command.
pub fn reprice_listing(
    config: CliConfig,
    format: OutputFormat,
    id: &str,
    host: &str,
    price: &str,
) -> CliResult<String> {
    let price = parse_price(price)?;
    let ctx = MarketContext::open(config)?;
    let listing = ctx
        .market
        .reprice_listing(&UserId::new(host), &ListingId::new(id), price)?;

    let output = ListingOutput {
        heading: "Repriced:",
        view: listing.into(),
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}
