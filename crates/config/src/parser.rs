use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse configuration text after environment variable substitution
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load the configuration at `path` if one was given, otherwise the built-in defaults
pub fn load_config_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<MasterConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using built-in defaults");
            Ok(generate_default_config())
        }
    }
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        exchange: ExchangeConfig {
            name: "OpenExchange Pay Later".to_string(),
            description: "Mock crypto exchange with a pay-later trading desk".to_string(),
            version: "0.1.0".to_string(),
        },
        pay_later: Some(PayLaterConfig::default()),
        market_data: Some(MarketDataConfig::default()),
        order_book: Some(OrderBookConfig::default()),
        logging: Some(LoggingConfig::default()),
        monitoring: None,
    }
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let config = generate_default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = parse_config(&yaml).unwrap();

        assert_eq!(parsed.exchange.name, config.exchange.name);
        assert_eq!(parsed.pay_later().wallet_address, config.pay_later().wallet_address);
        assert_eq!(parsed.market_data().history_candles, 150);
    }

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("openx-config-{}.yaml", std::process::id()));
        save_config(&generate_default_config(), &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.exchange.name, "OpenExchange Pay Later");
        assert!(!fs::read_to_string(&path).unwrap().contains("mode:"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_config("/nonexistent/openx/master_config.yaml").is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_config_or_default(None::<&str>).unwrap();
        assert_eq!(config.exchange.name, "OpenExchange Pay Later");
    }
}
