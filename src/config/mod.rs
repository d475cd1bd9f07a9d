pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://kaleidofinance.xyz/api/testnet";
pub const DEFAULT_REFERER: &str = "https://kaleidofinance.xyz/testnet";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Parser)]
#[command(name = "kldo-miner")]
#[command(about = "Simulated KLDO mining client for the testnet balance API")]
pub struct CliConfig {
    /// Base URL of the balance-tracking API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Plain-text wallet list, one 0x... address per line
    #[arg(long, default_value = "wallets.txt")]
    pub wallets_file: String,

    /// Directory holding the per-wallet session files
    #[arg(long, default_value = ".")]
    pub session_dir: String,

    /// Seconds between balance updates
    #[arg(long, default_value = "30")]
    pub update_interval_secs: u64,

    /// Request retry attempts before giving up on a cycle
    #[arg(long, default_value = "3")]
    pub retry_attempts: u32,

    /// Base retry delay in seconds (linear backoff: delay x attempt)
    #[arg(long, default_value = "2")]
    pub retry_delay_secs: u64,

    /// Optional TOML configuration file; values found there win
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

/// Resolved runtime settings, merged from CLI flags and the optional
/// TOML file.
#[derive(Debug, Clone)]
pub struct MinerSettings {
    pub api_base: String,
    pub referer: String,
    pub user_agent: String,
    pub wallets_file: String,
    pub session_dir: String,
    pub update_interval: Duration,
    pub retry: RetryPolicy,
}

impl MinerSettings {
    pub fn from_cli(cli: &CliConfig) -> Self {
        Self {
            api_base: cli.api_base.clone(),
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wallets_file: cli.wallets_file.clone(),
            session_dir: cli.session_dir.clone(),
            update_interval: Duration::from_secs(cli.update_interval_secs),
            retry: RetryPolicy {
                attempts: cli.retry_attempts,
                base_delay: Duration::from_secs(cli.retry_delay_secs),
            },
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base", &self.api_base)?;
        validation::validate_path("wallets_file", &self.wallets_file)?;
        validation::validate_path("session_dir", &self.session_dir)?;
        validation::validate_positive_number(
            "update_interval_secs",
            self.update_interval_secs,
            1,
        )?;
        validation::validate_positive_number("retry_attempts", self.retry_attempts as u64, 1)?;
        Ok(())
    }
}

impl Validate for MinerSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base", &self.api_base)?;
        validation::validate_path("wallets_file", &self.wallets_file)?;
        validation::validate_path("session_dir", &self.session_dir)?;
        validation::validate_positive_number(
            "update_interval_secs",
            self.update_interval.as_secs(),
            1,
        )?;
        validation::validate_positive_number("retry_attempts", self.retry.attempts as u64, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> CliConfig {
        CliConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            wallets_file: "wallets.txt".to_string(),
            session_dir: ".".to_string(),
            update_interval_secs: 30,
            retry_attempts: 3,
            retry_delay_secs: 2,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_default_cli_config_is_valid() {
        assert!(base_cli().validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut cli = base_cli();
        cli.update_interval_secs = 0;
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_settings_inherit_cli_values() {
        let mut cli = base_cli();
        cli.retry_delay_secs = 5;
        let settings = MinerSettings::from_cli(&cli);
        assert_eq!(settings.retry.base_delay, Duration::from_secs(5));
        assert_eq!(settings.update_interval, Duration::from_secs(30));
        assert_eq!(settings.referer, DEFAULT_REFERER);
    }
}
