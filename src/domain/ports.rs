use crate::domain::model::{BalanceResponse, BalanceUpdate, RegistrationResponse, SessionData};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MiningApi: Send + Sync {
    async fn check_registration(&self, wallet: &str) -> Result<RegistrationResponse>;
    async fn update_balance(&self, update: &BalanceUpdate) -> Result<BalanceResponse>;
}

pub trait SessionStore: Send + Sync {
    /// A missing or unreadable session resolves to `None`, never an error.
    fn load(
        &self,
        wallet: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionData>>> + Send;
    fn save(
        &self,
        wallet: &str,
        session: &SessionData,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
