use serde::{Deserialize, Serialize};

/// Hashrate reported in status logs and fed into the earnings formula.
/// Nothing is actually hashed; the value is cosmetic.
pub const DEFAULT_HASHRATE: f64 = 75.5;

/// Per-second earnings scale applied to hashrate * elapsed time.
pub const EARNINGS_RATE: f64 = 0.0001;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub total: f64,
    pub pending: f64,
    pub paid: f64,
}

#[derive(Debug, Clone)]
pub struct MiningState {
    pub active: bool,
    pub worker: String,
    pub pool: String,
    /// Session start, epoch milliseconds.
    pub start_time: i64,
}

impl Default for MiningState {
    fn default() -> Self {
        Self {
            active: false,
            worker: "quantum-rig-1".to_string(),
            pool: "quantum-1".to_string(),
            start_time: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Shares {
    pub accepted: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone)]
pub struct MinerStats {
    pub hashrate: f64,
    pub shares: Shares,
    pub efficiency: f64,
    pub power_usage: u32,
}

impl Default for MinerStats {
    fn default() -> Self {
        Self {
            hashrate: DEFAULT_HASHRATE,
            shares: Shares::default(),
            efficiency: 1.4,
            power_usage: 120,
        }
    }
}

/// Persisted per-wallet session, written as `session_<wallet>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub start_time: i64,
    pub earnings: Earnings,
    pub referral_bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub is_registered: bool,
    #[serde(default)]
    pub user_data: Option<UserData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub referral_bonus: Option<f64>,
}

impl RegistrationResponse {
    pub fn referral_bonus(&self) -> f64 {
        self.user_data
            .as_ref()
            .and_then(|u| u.referral_bonus)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceUpdate {
    pub wallet: String,
    pub earnings: Earnings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub success: bool,
    #[serde(default)]
    pub balance: f64,
}
