use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Wallet {wallet} is not registered")]
    WalletNotRegistered { wallet: String },

    #[error("Mining coordinator is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Config,
    Runtime,
}

impl MinerError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MinerError::ApiError(_) => ErrorSeverity::Medium,
            MinerError::IoError(_) => ErrorSeverity::Critical,
            MinerError::SerializationError(_) => ErrorSeverity::High,
            MinerError::ConfigValidationError { .. }
            | MinerError::InvalidConfigValueError { .. }
            | MinerError::MissingConfigError { .. } => ErrorSeverity::High,
            MinerError::WalletNotRegistered { .. } => ErrorSeverity::High,
            MinerError::AlreadyRunning => ErrorSeverity::Low,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MinerError::ApiError(_) => ErrorCategory::Network,
            MinerError::IoError(_) => ErrorCategory::Io,
            MinerError::SerializationError(_) => ErrorCategory::Data,
            MinerError::ConfigValidationError { .. }
            | MinerError::InvalidConfigValueError { .. }
            | MinerError::MissingConfigError { .. } => ErrorCategory::Config,
            MinerError::WalletNotRegistered { .. } | MinerError::AlreadyRunning => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MinerError::ApiError(_) => {
                "Check network connectivity and that the API endpoint is reachable"
            }
            MinerError::IoError(_) => "Check file permissions and available disk space",
            MinerError::SerializationError(_) => {
                "Delete the affected session file and restart to begin a fresh session"
            }
            MinerError::ConfigValidationError { .. }
            | MinerError::InvalidConfigValueError { .. }
            | MinerError::MissingConfigError { .. } => {
                "Review the CLI flags or TOML configuration file"
            }
            MinerError::WalletNotRegistered { .. } => {
                "Register the wallet on the testnet site before mining with it"
            }
            MinerError::AlreadyRunning => "The coordinator can only be started once per process",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MinerError::ApiError(e) => format!("Could not reach the mining API: {}", e),
            MinerError::IoError(e) => format!("File system operation failed: {}", e),
            MinerError::SerializationError(e) => format!("Could not read/write JSON data: {}", e),
            MinerError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            MinerError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not valid for {}: {}", value, field, reason)
            }
            MinerError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            MinerError::WalletNotRegistered { wallet } => {
                format!("Wallet {} is not registered on the testnet", wallet)
            }
            MinerError::AlreadyRunning => "The mining coordinator is already running".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MinerError>;
