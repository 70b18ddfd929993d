//! Marketplace context for CLI operations.

use parkline_ops::Marketplace;
use parkline_pay::{build_gateway, MockGateway, ProviderKind};
use parkline_store::MarketState;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Marketplace context containing all initialized components.
pub struct MarketContext {
    /// Operations interface.
    pub market: Marketplace,
    /// Configuration.
    pub config: CliConfig,
}

impl MarketContext {
    /// Open the database and connect the configured payment provider.
    pub fn open(config: CliConfig) -> CliResult<Self> {
        let ops_config = config.ops_config();
        ops_config.validate()?;

        let state = MarketState::open(config.market_state_config())?;
        let gateway = build_gateway(&config.gateway_config())?;
        tracing::debug!(
            provider = gateway.provider_name(),
            database = %config.storage.database.display(),
            "Marketplace context opened"
        );

        Ok(Self {
            market: Marketplace::new(state, gateway, ops_config),
            config,
        })
    }

    /// Currency used for displaying prices.
    pub fn currency(&self) -> &str {
        &self.config.checkout.currency
    }

    /// Open the mock provider's session file directly.
    ///
    /// Only valid when the configured provider is the mock; real providers
    /// are paid through their hosted pages.
    pub fn mock_gateway(config: &CliConfig) -> CliResult<MockGateway> {
        if config.payments.provider != ProviderKind::Mock {
            return Err(CliError::user(format!(
                "Payments can only be simulated with the mock provider (configured: {})",
                config.payments.provider
            )));
        }
        Ok(MockGateway::open(&config.payments.mock_state)?)
    }
}
