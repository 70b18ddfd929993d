//! Booking confirmation command.

use parkline_types::{SessionId, UserId};

use crate::config::CliConfig;
use crate::context::MarketContext;
use crate::error::CliResult;
use crate::output::{BookingOutput, OutputFormat, Render};

/// Execute the confirm command.
pub async fn confirm(
    config: CliConfig,
    format: OutputFormat,
    session: &str,
    user: &str,
) -> CliResult<String> {
    let ctx = MarketContext::open(config)?;
    let booking = ctx
        .market
        .confirm(&SessionId::new(session), &UserId::new(user))
        .await?;

    let output = BookingOutput::new(booking, ctx.currency());
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{json_field, publish, test_config};
    use crate::commands::{checkout, pay, show_listing, verify};
    use crate::error::CliError;
    use parkline_ops::OpsError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_full_booking_flow_across_invocations() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let listing = publish(&config, 1);

        let opened = checkout(config.clone(), OutputFormat::Json, &listing, "guest_1")
            .await
            .unwrap();
        let session = json_field(&opened, "session_id");

        // Not paid yet
        let early = confirm(config.clone(), OutputFormat::Json, &session, "guest_1").await;
        assert!(matches!(
            early,
            Err(CliError::Ops(OpsError::PaymentIncomplete { .. }))
        ));

        pay(config.clone(), OutputFormat::Json, &session, false).unwrap();

        let verified = verify(config.clone(), OutputFormat::Json, &session)
            .await
            .unwrap();
        assert!(verified.contains("\"paid\": true"));

        let booked = confirm(config.clone(), OutputFormat::Json, &session, "guest_1")
            .await
            .unwrap();
        let booking_id = json_field(&booked, "id");
        assert!(booking_id.starts_with("bkg_"));
        assert_eq!(json_field(&booked, "payment_id"), session);

        // Replays return the same booking
        let again = confirm(config.clone(), OutputFormat::Json, &session, "guest_1")
            .await
            .unwrap();
        assert_eq!(json_field(&again, "id"), booking_id);

        let shown = show_listing(config, OutputFormat::Json, &listing).unwrap();
        assert_eq!(json_field(&shown, "status"), "full");
    }

    #[tokio::test]
    async fn test_confirm_by_wrong_user() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let listing = publish(&config, 1);

        let opened = checkout(config.clone(), OutputFormat::Json, &listing, "guest_1")
            .await
            .unwrap();
        let session = json_field(&opened, "session_id");
        pay(config.clone(), OutputFormat::Json, &session, false).unwrap();

        let result = confirm(config, OutputFormat::Json, &session, "guest_2").await;
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Ops(OpsError::Unauthorized(_))));
        assert_eq!(err.exit_code(), 8);
    }
}
