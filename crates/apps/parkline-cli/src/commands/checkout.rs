//! Checkout session command.

use parkline_types::{ListingId, UserId};

use crate::config::CliConfig;
use crate::context::MarketContext;
use crate::error::CliResult;
use crate::output::{CheckoutOutput, OutputFormat, Render};

/// Execute the checkout command.
pub async fn checkout(
    config: CliConfig,
    format: OutputFormat,
    listing: &str,
    user: &str,
) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;
    let handle = ctx
        .market
        .create_session(&UserId::new(user), &ListingId::new(listing))
        .await?;

    let output = CheckoutOutput {
        handle,
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}
