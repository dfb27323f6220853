use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};
use std::{sync::Arc, time::Duration};
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

use crate::domain::errors::BcClientError;

use super::bc_client::BcClient;

/// A client for reading ephemeral network facts from the Solana blockchain.
#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
    num_retries: usize,
}

impl SolanaClient {
    /// Creates a new `SolanaClient` instance from the given RPC URL.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - The URL of the Solana RPC endpoint.
    /// * `timeout` - Upper bound for every single RPC request.
    /// * `num_retries` - How many times a failed request is retried.
    ///
    /// # Returns
    ///
    /// A new `SolanaClient` instance.
    pub fn from_url(rpc_url: &str, timeout: Duration, num_retries: usize) -> Self {
        Self {
            rpc_client: Arc::new(RpcClient::new_with_timeout_and_commitment(
                rpc_url.to_string(),
                timeout,
                CommitmentConfig::confirmed(),
            )),
            num_retries,
        }
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(500)
            .map(jitter)
            .take(self.num_retries)
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait::async_trait]
impl BcClient for SolanaClient {
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, BcClientError> {
        let result = Retry::spawn(self.retry_strategy(), || {
            self.rpc_client
                .get_minimum_balance_for_rent_exemption(data_len)
        })
        .await
        .map_err(|e| BcClientError::FailedToGetRentExemption(e.to_string()))?;
        Ok(result)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, BcClientError> {
        let result = Retry::spawn(self.retry_strategy(), || {
            self.rpc_client.get_latest_blockhash()
        })
        .await
        .map_err(|e| BcClientError::FailedToGetLatestBlockhash(e.to_string()))?;
        Ok(result)
    }
}
