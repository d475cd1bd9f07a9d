use crate::config::MinerSettings;
use crate::utils::error::{MinerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub miner: Option<MinerSection>,
    pub api: Option<ApiSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerSection {
    pub wallets_file: Option<String>,
    pub session_dir: Option<String>,
    pub update_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub endpoint: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MinerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MinerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitute environment variables of the `${VAR_NAME}` form.
    /// Unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Fold file values over the CLI-derived settings; the file wins
    /// wherever it specifies a value.
    pub fn apply(&self, settings: &mut MinerSettings) {
        if let Some(miner) = &self.miner {
            if let Some(wallets_file) = &miner.wallets_file {
                settings.wallets_file = wallets_file.clone();
            }
            if let Some(session_dir) = &miner.session_dir {
                settings.session_dir = session_dir.clone();
            }
            if let Some(secs) = miner.update_interval_secs {
                settings.update_interval = Duration::from_secs(secs);
            }
        }

        if let Some(api) = &self.api {
            if let Some(endpoint) = &api.endpoint {
                settings.api_base = endpoint.clone();
            }
            if let Some(referer) = &api.referer {
                settings.referer = referer.clone();
            }
            if let Some(user_agent) = &api.user_agent {
                settings.user_agent = user_agent.clone();
            }
            if let Some(attempts) = api.retry_attempts {
                settings.retry.attempts = attempts;
            }
            if let Some(delay) = api.retry_delay_seconds {
                settings.retry.base_delay = Duration::from_secs(delay);
            }
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(api) = &self.api {
            if let Some(endpoint) = &api.endpoint {
                validation::validate_url("api.endpoint", endpoint)?;
            }
            if let Some(attempts) = api.retry_attempts {
                validation::validate_positive_number("api.retry_attempts", attempts as u64, 1)?;
            }
        }

        if let Some(miner) = &self.miner {
            if let Some(wallets_file) = &miner.wallets_file {
                validation::validate_path("miner.wallets_file", wallets_file)?;
            }
            if let Some(secs) = miner.update_interval_secs {
                validation::validate_positive_number("miner.update_interval_secs", secs, 1)?;
            }
        }

        Ok(())
    }
}
