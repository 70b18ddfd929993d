//! Initialize configuration and database command.

use std::path::Path;

use parkline_store::MarketState;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{InitOutput, OutputFormat, Render};

/// Execute the init command.
pub fn init(
    config: CliConfig,
    format: OutputFormat,
    config_path: &Path,
    force: bool,
) -> CliResult<String> {
    if config_path.exists() && !force {
        return Err(CliError::AlreadyInitialized(config_path.to_path_buf()));
    }

    // Create the data directory and schema
    MarketState::open(config.market_state_config())?;

    config.save(config_path)?;

    let output = InitOutput {
        config_path: config_path.to_string_lossy().to_string(),
        database: config.storage.database.to_string_lossy().to_string(),
        provider: config.payments.provider.to_string(),
    };

    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config_and_database() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let path = temp_dir.path().join("config.toml");

        let output = init(config.clone(), OutputFormat::Human, &path, false).unwrap();
        assert!(output.contains("Configuration saved to"));
        assert!(path.exists());
        assert!(config.storage.database.exists());

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.storage.database, config.storage.database);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let path = temp_dir.path().join("config.toml");

        init(config.clone(), OutputFormat::Human, &path, false).unwrap();

        let again = init(config.clone(), OutputFormat::Human, &path, false);
        assert!(matches!(again, Err(CliError::AlreadyInitialized(_))));

        assert!(init(config, OutputFormat::Json, &path, true).is_ok());
    }
}
