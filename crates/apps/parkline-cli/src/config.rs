//! CLI configuration.

use chrono::{DateTime, SecondsFormat, Utc};
use parkline_ops::{CheckoutConfig, OpsConfig};
use parkline_pay::{GatewayConfig, ProviderKind, RetryConfig, STRIPE_API_BASE};
use parkline_store::{default_data_dir, MarketStateConfig};
use parkline_types::{Amount, ParklineError, Timestamp, DEFAULT_CURRENCY, DEFAULT_QUERY_LIMIT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CliError, CliResult};

/// Expand environment variables in a string.
/// Supports `${VAR_NAME}` syntax.
fn expand_env_vars(input: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return input.to_string();
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Payment provider configuration.
    pub payments: PaymentsConfig,
    /// Checkout session configuration.
    pub checkout: CheckoutSection,
    /// Display configuration.
    pub display: DisplayConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        let base_dir = default_data_dir();
        Self {
            storage: StorageConfig::new(&base_dir),
            payments: PaymentsConfig::new(&base_dir),
            checkout: CheckoutSection::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl CliConfig {
    /// Configuration rooted at `base_dir` instead of the default data dir.
    pub fn with_base_dir(base_dir: &Path) -> Self {
        Self {
            storage: StorageConfig::new(base_dir),
            payments: PaymentsConfig::new(base_dir),
            ..Self::default()
        }
    }

    /// Load configuration from a file.
    /// Environment variables in `${VAR}` format are expanded in the
    /// provider secret key, API base and checkout URLs.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;

        config.payments.secret_key = config
            .payments
            .secret_key
            .as_deref()
            .map(expand_env_vars);
        config.payments.api_base = expand_env_vars(&config.payments.api_base);
        config.checkout.success_url = expand_env_vars(&config.checkout.success_url);
        config.checkout.cancel_url = expand_env_vars(&config.checkout.cancel_url);

        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the base directory for all parkline data.
    pub fn base_dir(&self) -> PathBuf {
        self.storage.data_dir.clone()
    }

    /// Store configuration derived from `[storage]`.
    pub fn market_state_config(&self) -> MarketStateConfig {
        MarketStateConfig::new(&self.storage.data_dir)
            .with_database_path(&self.storage.database)
            .with_busy_timeout(Duration::from_millis(self.storage.busy_timeout_ms))
    }

    /// Gateway configuration derived from `[payments]`.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            provider: self.payments.provider,
            api_base: self.payments.api_base.clone(),
            secret_key: self.payments.secret_key.clone(),
            timeout: Duration::from_secs(self.payments.timeout_secs),
            mock_state_path: Some(self.payments.mock_state.clone()),
            retry: RetryConfig {
                max_attempts: self.payments.max_attempts,
                ..RetryConfig::default()
            },
        }
    }

    /// Operations configuration derived from `[checkout]`.
    pub fn ops_config(&self) -> OpsConfig {
        OpsConfig::new(CheckoutConfig {
            currency: self.checkout.currency.clone(),
            product_name: self.checkout.product_name.clone(),
            success_url: self.checkout.success_url.clone(),
            cancel_url: self.checkout.cancel_url.clone(),
        })
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for parkline data.
    pub data_dir: PathBuf,
    /// Path to the SQLite database.
    pub database: PathBuf,
    /// How long a write waits for a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    fn new(base_dir: &Path) -> Self {
        Self {
            data_dir: base_dir.to_path_buf(),
            database: base_dir.join("parkline.db"),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(&default_data_dir())
    }
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Payment provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Provider to use ("mock" or "stripe").
    pub provider: ProviderKind,
    /// Provider secret key, usually `${STRIPE_SECRET_KEY}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Provider API base URL.
    pub api_base: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts for session lookups, including the first.
    pub max_attempts: u32,
    /// File the mock provider keeps its sessions in.
    pub mock_state: PathBuf,
}

impl PaymentsConfig {
    fn new(base_dir: &Path) -> Self {
        Self {
            provider: ProviderKind::Mock,
            secret_key: None,
            api_base: STRIPE_API_BASE.to_string(),
            timeout_secs: 30,
            max_attempts: RetryConfig::default().max_attempts,
            mock_state: base_dir.join("mock-sessions.json"),
        }
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self::new(&default_data_dir())
    }
}

/// Checkout session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSection {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Line item name shown on the payment page.
    pub product_name: String,
    /// Redirect after payment; must contain `{CHECKOUT_SESSION_ID}`.
    pub success_url: String,
    /// Redirect after cancelling.
    pub cancel_url: String,
}

impl Default for CheckoutSection {
    fn default() -> Self {
        let defaults = CheckoutConfig::default();
        Self {
            currency: defaults.currency,
            product_name: defaults.product_name,
            success_url: defaults.success_url,
            cancel_url: defaults.cancel_url,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Output format when `--format` is not given.
    pub default_format: String,
    /// Default number of listings shown by `listing list`.
    pub list_limit: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_format: "human".to_string(),
            list_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

// =============================================================================
// Prices and Times
// =============================================================================

/// Parse a decimal price such as `12.50` into minor units (cents).
pub fn parse_price(input: &str) -> Result<Amount, ParklineError> {
    let invalid = || ParklineError::InvalidInput(format!("invalid price: {:?}", input));

    let trimmed = input.trim().trim_start_matches('$');
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: u64 = format!("{:0<2}", fraction).parse().map_err(|_| invalid())?;

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(invalid)
}

/// Format minor units in the given currency.
pub fn format_price(amount: Amount, currency: &str) -> String {
    let major = amount / 100;
    let minor = amount % 100;
    if currency.eq_ignore_ascii_case(DEFAULT_CURRENCY) {
        format!("${}.{:02}", major, minor)
    } else {
        format!("{}.{:02} {}", major, minor, currency.to_ascii_uppercase())
    }
}

/// Parse an RFC 3339 time into milliseconds since the epoch.
pub fn parse_time(input: &str) -> Result<Timestamp, ParklineError> {
    let parsed = DateTime::parse_from_rfc3339(input.trim()).map_err(|e| {
        ParklineError::InvalidInput(format!("invalid time {:?}: {}", input, e))
    })?;
    u64::try_from(parsed.timestamp_millis())
        .map_err(|_| ParklineError::InvalidInput(format!("time before 1970: {:?}", input)))
}

/// Format milliseconds since the epoch as RFC 3339 (UTC).
pub fn format_time(ts: Timestamp) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.payments.provider, ProviderKind::Mock);
        assert_eq!(config.checkout.currency, "usd");
        assert_eq!(config.display.default_format, "human");
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = CliConfig::with_base_dir(temp_dir.path());
        config.checkout.product_name = "Game day parking".to_string();
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.checkout.product_name, "Game day parking");
        assert_eq!(loaded.storage.database, temp_dir.path().join("parkline.db"));
        assert_eq!(
            loaded.payments.mock_state,
            temp_dir.path().join("mock-sessions.json")
        );
    }

    #[test]
    fn test_load_expands_secret_key() {
        std::env::set_var("PARKLINE_TEST_STRIPE_KEY", "sk_test_123");

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[payments]\nprovider = \"stripe\"\nsecret_key = \"${PARKLINE_TEST_STRIPE_KEY}\"\n",
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.payments.provider, ProviderKind::Stripe);
        assert_eq!(config.payments.secret_key.as_deref(), Some("sk_test_123"));
        assert!(config.gateway_config().validate().is_ok());

        std::env::remove_var("PARKLINE_TEST_STRIPE_KEY");
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("PARKLINE_TEST_HOST", "https://parking.example.com");

        let result = expand_env_vars("${PARKLINE_TEST_HOST}/cancel");
        assert_eq!(result, "https://parking.example.com/cancel");

        // Unset variable should remain as-is
        let unset = expand_env_vars("${NONEXISTENT_VAR_12345}");
        assert_eq!(unset, "${NONEXISTENT_VAR_12345}");

        std::env::remove_var("PARKLINE_TEST_HOST");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.50").unwrap(), 1250);
        assert_eq!(parse_price("12.5").unwrap(), 1250);
        assert_eq!(parse_price("12").unwrap(), 1200);
        assert_eq!(parse_price("$0.99").unwrap(), 99);
        assert_eq!(parse_price(".75").unwrap(), 75);

        assert!(parse_price("").is_err());
        assert!(parse_price("12.345").is_err());
        assert!(parse_price("-1").is_err());
        assert!(parse_price("1e3").is_err());
        assert!(parse_price("ten").is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1250, "usd"), "$12.50");
        assert_eq!(format_price(5, "usd"), "$0.05");
        assert_eq!(format_price(1000, "eur"), "10.00 EUR");
    }

    #[test]
    fn test_times() {
        let ts = parse_time("2026-01-01T18:00:00Z").unwrap();
        assert_eq!(ts, 1_767_290_400_000);
        assert_eq!(format_time(ts), "2026-01-01T18:00:00Z");

        let offset = parse_time("2026-01-01T13:00:00-05:00").unwrap();
        assert_eq!(offset, ts);

        assert!(parse_time("tomorrow").is_err());
    }
}
