//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::static_capabilities::StaticCapabilities;
use crate::adapters::{ClipPlanConfig, LogFormat, TomlConfigAdapter};
use crate::cli::Cli;
use crate::ports::CapabilityPort;

/// Environment variables recognised as overrides
pub const ENV_LOG_LEVEL: &str = "CLIPPLAN_LOG_LEVEL";
pub const ENV_HW_ENCODERS: &str = "CLIPPLAN_HW_ENCODERS";
pub const ENV_LIBPLACEBO: &str = "CLIPPLAN_LIBPLACEBO";
pub const ENV_OVERHEAD_MARGIN_BP: &str = "CLIPPLAN_OVERHEAD_MARGIN_BP";

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<ClipPlanConfig> {
    let base = std::env::current_dir().context("Failed to read current directory")?;

    // Defaults, then file
    let mut adapter = TomlConfigAdapter::new();
    let mut config = adapter
        .load_or_default(cli.config.as_deref(), &base)
        .context("Failed to load configuration file")?;

    // Environment
    apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;

    // CLI arguments
    apply_cli_configuration_overrides(&mut config, cli)?;

    config
        .validate()
        .context("Invalid configuration after overrides")?;
    Ok(config)
}

/// Apply environment overrides read through `lookup`
pub fn apply_environment_overrides<F>(config: &mut ClipPlanConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
        env_overrides += 1;
    }

    if let Some(list) = lookup(ENV_HW_ENCODERS) {
        let parsed = StaticCapabilities::from_list(&list, config.capabilities.libplacebo)
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", ENV_HW_ENCODERS, e))?;
        config.capabilities.hardware_encoders = parsed.capabilities().hardware_encoders;
        env_overrides += 1;
    }

    if let Some(value) = lookup(ENV_LIBPLACEBO) {
        config.capabilities.libplacebo = parse_bool(&value)
            .with_context(|| format!("Invalid {}: {}", ENV_LIBPLACEBO, value))?;
        env_overrides += 1;
    }

    if let Some(value) = lookup(ENV_OVERHEAD_MARGIN_BP) {
        config.policy.overhead_margin_bp = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_OVERHEAD_MARGIN_BP, value))?;
        env_overrides += 1;
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    Ok(())
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_configuration_overrides(config: &mut ClipPlanConfig, cli: &Cli) -> Result<()> {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        cli_overrides += 1;
    }

    if let Some(format) = &cli.log_format {
        config.logging.format = format
            .parse::<LogFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
        cli_overrides += 1;
    }

    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("'{}' is not a boolean", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Encoder;
    use clap::Parser;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = ClipPlanConfig::default();
        apply_environment_overrides(
            &mut config,
            env(&[
                (ENV_LOG_LEVEL, "debug"),
                (ENV_HW_ENCODERS, "h264-nvenc"),
                (ENV_LIBPLACEBO, "yes"),
                (ENV_OVERHEAD_MARGIN_BP, "350"),
            ]),
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.capabilities.hardware_encoders, vec![Encoder::H264Nvenc]);
        assert!(config.capabilities.libplacebo);
        assert_eq!(config.policy.overhead_margin_bp, 350);
    }

    #[test]
    fn test_environment_rejects_garbage() {
        let mut config = ClipPlanConfig::default();
        assert!(apply_environment_overrides(&mut config, env(&[(ENV_LIBPLACEBO, "maybe")])).is_err());
        assert!(apply_environment_overrides(&mut config, env(&[(ENV_HW_ENCODERS, "x264")])).is_err());
    }

    #[test]
    fn test_cli_beats_environment() {
        let mut config = ClipPlanConfig::default();
        apply_environment_overrides(&mut config, env(&[(ENV_LOG_LEVEL, "debug")])).unwrap();

        let cli = Cli::parse_from([
            "clipplan",
            "--log-level",
            "warn",
            "--log-format",
            "json",
            "inspect",
            "--probe",
            "p.json",
        ]);
        apply_cli_configuration_overrides(&mut config, &cli).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let mut config = ClipPlanConfig::default();
        let cli = Cli::parse_from(["clipplan", "--log-format", "xml", "inspect", "--probe", "p.json"]);
        assert!(apply_cli_configuration_overrides(&mut config, &cli).is_err());
    }
}
