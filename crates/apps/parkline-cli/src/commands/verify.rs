//! Session verification command.

use parkline_types::SessionId;

use crate::config::CliConfig;
use crate::context::MarketContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, VerifyOutput};

/// Execute the verify command.
pub async fn verify(config: CliConfig, format: OutputFormat, session: &str) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;
    let verification = ctx.market.verify_session(&SessionId::new(session)).await?;

    let output = VerifyOutput {
        verification,
        currency: ctx.currency().to_string(),
    };
    Ok(output.render(format))
}
