use crate::domain::errors::BcClientError;
#[cfg(test)]
use mockall::automock;
use solana_sdk::hash::Hash;

/// A trait representing the Solana RPC calls needed to make a transaction valid right now.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BcClient: Send + Sync {
    /// Retrieves the minimum balance an account of `data_len` bytes must hold to be rent exempt.
    ///
    /// # Arguments
    ///
    /// * `data_len` - Size of the account data in bytes.
    ///
    /// # Returns
    ///
    /// * `Result<u64, BcClientError>` - The balance in lamports if successful, or an error if the operation fails.
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, BcClientError>;

    /// Retrieves the latest blockhash from the Solana network.
    ///
    /// # Returns
    ///
    /// * `Result<Hash, BcClientError>` - The blockhash if successful, or an error if the operation fails.
    async fn get_latest_blockhash(&self) -> Result<Hash, BcClientError>;
}
