pub mod client;
pub mod coordinator;
pub mod session;
pub mod worker;

pub use crate::domain::model::{
    BalanceResponse, BalanceUpdate, Earnings, MinerStats, MiningState, RegistrationResponse,
    SessionData, Shares, UserData, EARNINGS_RATE,
};
pub use crate::domain::ports::{MiningApi, SessionStore};
pub use crate::utils::error::Result;
