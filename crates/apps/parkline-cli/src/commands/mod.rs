//! CLI command implementations.

pub mod bookings;
pub mod checkout;
pub mod completions;
pub mod confirm;
pub mod init;
pub mod listing;
pub mod pay;
pub mod verify;

// Re-export command handlers
pub use bookings::bookings;
pub use checkout::checkout;
pub use completions::completions;
pub use confirm::confirm;
pub use init::init;
pub use listing::{
    deactivate_listing, list_listings, publish_listing, reprice_listing, show_listing,
    PublishArgs,
};
pub use pay::pay;
pub use verify::verify;

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use crate::config::CliConfig;
    use crate::output::OutputFormat;

    /// Configuration rooted in a temp directory using the mock provider.
    pub fn test_config(temp_dir: &TempDir) -> CliConfig {
        CliConfig::with_base_dir(temp_dir.path())
    }

    /// Publish a listing through the CLI and return its id.
    pub fn publish(config: &CliConfig, spaces: u32) -> String {
        let output = super::publish_listing(
            config.clone(),
            OutputFormat::Json,
            super::PublishArgs {
                spot: "spot_1".to_string(),
                host: "host_1".to_string(),
                title: "Stadium lot".to_string(),
                event: "Home opener".to_string(),
                price: "12.50".to_string(),
                spaces,
                start: "2026-01-01T18:00:00Z".to_string(),
                end: "2026-01-01T22:00:00Z".to_string(),
            },
        )
        .unwrap();
        json_field(&output, "id")
    }

    /// Read a string field from JSON command output.
    pub fn json_field(output: &str, field: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(output).unwrap();
        value[field].as_str().unwrap().to_string()
    }
}
