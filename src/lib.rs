pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, MinerSettings, RetryPolicy};
pub use core::client::KaleidoClient;
pub use core::coordinator::{MiningCoordinator, MiningSummary};
pub use core::session::FileSessionStore;
pub use core::worker::MinerWorker;
pub use utils::error::{MinerError, Result};
