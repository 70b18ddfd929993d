//! Simulated payment command for the mock provider.

use parkline_types::{PaymentStatus, SessionId};

use crate::config::CliConfig;
use crate::context::MarketContext;
use crate::error::CliResult;
use crate::output::{OutputFormat, PayOutput, Render};

/// Execute the pay command.
///
/// Marks a mock session paid (or expired), standing in for the guest
/// finishing the hosted payment page.
pub fn pay(
    config: CliConfig,
    format: OutputFormat,
    session: &str,
    expire: bool,
) -> CliResult<String> {
    let gateway = MarketContext::mock_gateway(&config)?;
    let session_id = SessionId::new(session);

    let status = if expire {
        gateway.expire(&session_id)?;
        PaymentStatus::Expired
    } else {
        gateway.mark_paid(&session_id)?;
        PaymentStatus::Paid
    };

    let output = PayOutput {
        session_id: session_id.to_string(),
        status,
    };
    Ok(output.render(format))
}
