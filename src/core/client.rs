use crate::config::{MinerSettings, RetryPolicy};
use crate::core::{BalanceResponse, BalanceUpdate, MiningApi, RegistrationResponse, Result};
use crate::utils::error::MinerError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the testnet balance-tracking API.
#[derive(Clone)]
pub struct KaleidoClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl KaleidoClient {
    pub fn new(settings: &MinerSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&settings.referer).map_err(|e| {
                MinerError::InvalidConfigValueError {
                    field: "referer".to_string(),
                    value: settings.referer.clone(),
                    reason: e.to_string(),
                }
            })?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent).map_err(|e| {
                MinerError::InvalidConfigValueError {
                    field: "user_agent".to_string(),
                    value: settings.user_agent.clone(),
                    reason: e.to_string(),
                }
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_base.trim_end_matches('/').to_string(),
            retry: settings.retry,
        })
    }

    /// Runs a request up to `retry.attempts` times with linear backoff
    /// (base delay x attempt number). The last error is returned as-is.
    async fn retry_request<T, F, Fut>(&self, operation: &str, request: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1u32;

        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        "[{}] request failed, retrying ({}/{}): {}",
                        operation,
                        attempt,
                        attempts,
                        err
                    );
                    tokio::time::sleep(self.retry.base_delay * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl MiningApi for KaleidoClient {
    async fn check_registration(&self, wallet: &str) -> Result<RegistrationResponse> {
        let url = format!("{}/check-registration", self.base_url);
        self.retry_request("check-registration", || {
            tracing::debug!("GET {} wallet={}", url, wallet);
            let request = self.client.get(&url).query(&[("wallet", wallet)]);
            async move {
                let response = request.send().await?.error_for_status()?;
                Ok(response.json::<RegistrationResponse>().await?)
            }
        })
        .await
    }

    async fn update_balance(&self, update: &BalanceUpdate) -> Result<BalanceResponse> {
        let url = format!("{}/update-balance", self.base_url);
        self.retry_request("update-balance", || {
            tracing::debug!("POST {} wallet={}", url, update.wallet);
            let request = self.client.post(&url).json(update);
            async move {
                let response = request.send().await?.error_for_status()?;
                Ok(response.json::<BalanceResponse>().await?)
            }
        })
        .await
    }
}
