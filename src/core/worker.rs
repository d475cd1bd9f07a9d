use crate::core::{
    BalanceUpdate, Earnings, MinerStats, MiningApi, MiningState, Result, SessionData,
    SessionStore, EARNINGS_RATE,
};
use crate::utils::error::MinerError;
use std::time::Duration;
use tokio::sync::watch;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// One independent miner loop for a single wallet.
pub struct MinerWorker<A: MiningApi, S: SessionStore> {
    wallet: String,
    index: usize,
    api: A,
    sessions: S,
    earnings: Earnings,
    state: MiningState,
    referral_bonus: f64,
    stats: MinerStats,
    update_interval: Duration,
}

impl<A: MiningApi, S: SessionStore> MinerWorker<A, S> {
    pub fn new(
        wallet: String,
        index: usize,
        api: A,
        sessions: S,
        update_interval: Duration,
    ) -> Self {
        Self {
            wallet,
            index,
            api,
            sessions,
            earnings: Earnings::default(),
            state: MiningState::default(),
            referral_bonus: 0.0,
            stats: MinerStats::default(),
            update_interval,
        }
    }

    pub fn wallet(&self) -> &str {
        &self.wallet
    }

    pub fn earnings(&self) -> Earnings {
        self.earnings
    }

    pub fn referral_bonus(&self) -> f64 {
        self.referral_bonus
    }

    /// Checks registration, resumes a previous session if one exists,
    /// and marks the worker active.
    pub async fn initialize(&mut self) -> Result<()> {
        let registration = self.api.check_registration(&self.wallet).await?;

        if !registration.is_registered {
            return Err(MinerError::WalletNotRegistered {
                wallet: self.wallet.clone(),
            });
        }

        let resumed = match self.sessions.load(&self.wallet).await? {
            Some(session) => {
                self.state.start_time = session.start_time;
                self.earnings = session.earnings;
                self.referral_bonus = session.referral_bonus;
                true
            }
            None => {
                self.referral_bonus = registration.referral_bonus();
                self.earnings = Earnings {
                    total: self.referral_bonus,
                    pending: 0.0,
                    paid: 0.0,
                };
                self.state.start_time = now_ms();
                false
            }
        };

        self.state.active = true;
        tracing::info!(
            "[wallet {}] Mining {} successfully",
            self.index,
            if resumed { "resumed" } else { "initialized" }
        );

        Ok(())
    }

    fn elapsed_secs(&self) -> f64 {
        (now_ms() - self.state.start_time) as f64 / 1000.0
    }

    /// `hashrate * elapsed_seconds * rate * (1 + referral_bonus)`
    fn earnings_for(&self, elapsed_secs: f64) -> f64 {
        self.stats.hashrate * elapsed_secs * EARNINGS_RATE * (1.0 + self.referral_bonus)
    }

    fn calculate_earnings(&self) -> f64 {
        self.earnings_for(self.elapsed_secs())
    }

    /// Reports the current earnings to the server. On a final update
    /// the pending amount is folded into paid. The server's returned
    /// balance is authoritative for the new total.
    pub async fn update_balance(&mut self, final_update: bool) -> Result<()> {
        let new_earnings = self.calculate_earnings();
        let update = BalanceUpdate {
            wallet: self.wallet.clone(),
            earnings: Earnings {
                total: self.earnings.total + new_earnings,
                pending: if final_update { 0.0 } else { new_earnings },
                paid: if final_update {
                    self.earnings.paid + new_earnings
                } else {
                    self.earnings.paid
                },
            },
        };

        let response = self.api.update_balance(&update).await?;

        if !response.success {
            tracing::warn!(
                "[wallet {}] Server rejected the balance update, keeping local state",
                self.index
            );
            return Ok(());
        }

        self.earnings = Earnings {
            total: response.balance,
            pending: update.earnings.pending,
            paid: update.earnings.paid,
        };

        self.save_session().await;
        self.log_status(final_update);
        Ok(())
    }

    async fn save_session(&self) {
        let session = SessionData {
            start_time: self.state.start_time,
            earnings: self.earnings,
            referral_bonus: self.referral_bonus,
        };

        if let Err(e) = self.sessions.save(&self.wallet, &session).await {
            tracing::error!("[wallet {}] Failed to save session: {}", self.index, e);
        }
    }

    fn log_status(&self, final_update: bool) {
        let status_type = if final_update {
            "final status"
        } else {
            "mining status"
        };

        tracing::info!(
            "[wallet {}] === {} ===\n\
             \twallet: {}\n\
             \tuptime: {:.0}s | active: {}\n\
             \thashrate: {} MH/s\n\
             \ttotal: {:.8} KLDO\n\
             \tpending: {:.8} KLDO\n\
             \tpaid: {:.8} KLDO\n\
             \treferral bonus: +{:.1}%",
            self.index,
            status_type,
            self.wallet,
            self.elapsed_secs(),
            self.state.active,
            self.stats.hashrate,
            self.earnings.total,
            self.earnings.pending,
            self.earnings.paid,
            self.referral_bonus * 100.0
        );
    }

    /// Runs the timer-driven mining loop until `shutdown` flips to
    /// true, then performs the final flush. Returns the paid total.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> f64 {
        if let Err(e) = self.initialize().await {
            tracing::error!("[wallet {}] Initialization failed: {}", self.index, e);
            return 0.0;
        }

        let mut interval = tokio::time::interval(self.update_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.update_balance(false).await {
                        // Skip the cycle; the next tick tries again.
                        tracing::error!("[wallet {}] Balance update failed: {}", self.index, e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.stop().await
    }

    /// Final flush: fold pending into paid, persist the session, and
    /// report the paid total.
    pub async fn stop(&mut self) -> f64 {
        self.state.active = false;

        if let Err(e) = self.update_balance(true).await {
            tracing::error!("[wallet {}] Final balance update failed: {}", self.index, e);
        }

        self.save_session().await;
        self.earnings.paid
    }
}
