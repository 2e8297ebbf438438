//! Configuration Loader - File Loading and Validation
//!
//! Handles loading an optional TOML override file, validating all
//! parameters, and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use super::EngineConfig;

/// Load and validate configuration.
///
/// With no path, returns validated defaults.
///
/// # Errors
/// Returns a detailed error if the file doesn't exist or can't be read,
/// TOML parsing fails, or a validation rule is violated.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        None => EngineConfig::default(),
        Some(path) => {
            let content = std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read config file: {}", path.display())
            })?;
            let config: EngineConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!(path = %path.display(), "Configuration overrides loaded");
            config
        }
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate all configuration parameters.
///
/// Tolerances must be positive and small enough to mean anything; a
/// tolerance of a whole currency unit would wave every mismatch through.
fn validate_config(config: &EngineConfig) -> Result<()> {
    let one = dec!(1);

    anyhow::ensure!(
        config.settlement.materiality_threshold >= Decimal::ZERO
            && config.settlement.materiality_threshold < one,
        "materiality_threshold must be in [0, 1), got {}",
        config.settlement.materiality_threshold
    );

    let tolerances = [
        ("score", config.verify.score),
        ("payout", config.verify.payout),
        ("payout_adjusted", config.verify.payout_adjusted),
        ("stored_sum", config.verify.stored_sum),
        ("exact_sum", config.verify.exact_sum),
        ("settlement_net", config.verify.settlement_net),
    ];
    for (name, value) in tolerances {
        anyhow::ensure!(
            value > Decimal::ZERO && value < one,
            "verify.{name} tolerance must be in (0, 1), got {value}"
        );
    }

    anyhow::ensure!(
        config.verify.payout_adjusted >= config.verify.payout,
        "verify.payout_adjusted ({}) must be at least verify.payout ({})",
        config.verify.payout_adjusted,
        config.verify.payout
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = load_config(None).unwrap();
        assert_eq!(config.settlement.materiality_threshold, dec!(0.005));
        assert_eq!(config.verify.score, dec!(0.0001));
        assert_eq!(config.verify.payout_adjusted, dec!(0.02));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config(Some(Path::new("nonexistent.toml")));
        assert!(result.is_err());
    }
}
