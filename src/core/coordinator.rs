use crate::config::MinerSettings;
use crate::core::client::KaleidoClient;
use crate::core::session::FileSessionStore;
use crate::core::worker::MinerWorker;
use crate::core::Result;
use crate::utils::error::MinerError;
use crate::utils::validation;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinSet;

/// The end-of-run report: how many wallets mined and what they were
/// paid in total.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiningSummary {
    pub wallets: usize,
    pub total_paid: f64,
}

/// Spawns one worker task per wallet and coordinates their shutdown.
pub struct MiningCoordinator {
    settings: MinerSettings,
    running: AtomicBool,
}

impl MiningCoordinator {
    pub fn new(settings: MinerSettings) -> Self {
        Self {
            settings,
            running: AtomicBool::new(false),
        }
    }

    /// Reads the wallet list: one address per line, trimmed. Lines not
    /// starting with `0x` are skipped silently; malformed `0x` lines
    /// are skipped with a warning.
    pub fn load_wallets<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let data = std::fs::read_to_string(path)?;

        let mut wallets = Vec::new();
        for line in data.lines() {
            let line = line.trim();
            if !line.starts_with("0x") {
                continue;
            }
            match validation::validate_wallet_address("wallets_file", line) {
                Ok(()) => wallets.push(line.to_string()),
                Err(e) => tracing::warn!("Skipping malformed wallet address: {}", e),
            }
        }

        Ok(wallets)
    }

    /// Runs every worker until the `shutdown` future resolves, then
    /// broadcasts the stop, awaits each worker's final flush, and sums
    /// the paid totals.
    pub async fn run<F>(&self, shutdown: F) -> Result<MiningSummary>
    where
        F: Future<Output = ()>,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(MinerError::AlreadyRunning);
        }

        let wallets = Self::load_wallets(&self.settings.wallets_file)?;
        if wallets.is_empty() {
            self.running.store(false, Ordering::SeqCst);
            return Err(MinerError::ConfigValidationError {
                field: "wallets_file".to_string(),
                message: format!(
                    "No valid wallets found in {}",
                    self.settings.wallets_file
                ),
            });
        }

        tracing::info!("Loaded {} wallet(s)", wallets.len());

        let api = match KaleidoClient::new(&self.settings) {
            Ok(api) => api,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers = JoinSet::new();

        for (index, wallet) in wallets.iter().enumerate() {
            let api = api.clone();
            let sessions = FileSessionStore::new(&self.settings.session_dir);
            let worker = MinerWorker::new(
                wallet.clone(),
                index + 1,
                api,
                sessions,
                self.settings.update_interval,
            );
            workers.spawn(worker.run(shutdown_rx.clone()));
        }

        shutdown.await;

        tracing::info!("Shutting down miners...");
        let _ = shutdown_tx.send(true);

        let mut total_paid = 0.0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(paid) => total_paid += paid,
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        self.running.store(false, Ordering::SeqCst);

        Ok(MiningSummary {
            wallets: wallets.len(),
            total_paid,
        })
    }
}
