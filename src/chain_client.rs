use thiserror::Error;

/// Test chain client module
pub mod test_chain_client;

use async_trait::async_trait;

use crate::{
    address::Address,
    asset_id::AssetId,
    transaction::{TxId, UnbuiltTransaction},
    values::Values,
};
use std::error;

/// Interface defining interactions with a specific chain. The abstraction
/// allows fake and locally-persisted chains to stand in for a real deployment
/// in tests and simulations.
#[async_trait]
pub trait ChainClient<State, Call>: Send + Sync {
    /// Get the address of the account currently signing transactions
    async fn signer_address(&self) -> ChainClientResult<Address>;

    /// Get the addresses of all accounts known to the instance of the `ChainClient`
    async fn signer_addresses(&self) -> ChainClientResult<Vec<Address>>;

    /// Get the complete multi-asset value held by a given address
    async fn account_values(&self, address: &Address) -> ChainClientResult<Values>;

    /// Get the balance of a specific asset at a given address
    async fn balance_at_address(
        &self,
        address: &Address,
        asset_id: &AssetId,
    ) -> ChainClientResult<u64> {
        let bal = self
            .account_values(address)
            .await?
            .get(asset_id)
            .unwrap_or_default();
        Ok(bal)
    }

    /// Get the stored state of the contract deployed at `address`, if any
    async fn contract_state(&self, address: &Address) -> ChainClientResult<Option<State>>;

    /// Submit a transaction signed by the active signer
    async fn submit(&self, tx: UnbuiltTransaction<State, Call>) -> ChainClientResult<TxId>;

    /// Get the posix time of the most recent block
    async fn last_block_time_secs(&self) -> ChainClientResult<i64>;

    /// Get the current time in seconds since the UNIX epoch
    async fn current_time_secs(&self) -> ChainClientResult<i64>;
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("Bad address: {0:?}")]
    BadAddress(Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve account values at {0:?}: {1:?}.")]
    FailedToRetrieveAccountAt(Address, Box<dyn error::Error + Send + Sync>),
    #[error("Failed to retrieve contract state at {0:?}: {1:?}.")]
    FailedToRetrieveStateAt(Address, Box<dyn error::Error + Send + Sync>),
    #[error("No contract deployed at {0:?}")]
    ContractNotFound(Address),
    #[error("Failed to submit transaction: {0:?}")]
    FailedToSubmitTx(Box<dyn error::Error + Send + Sync>),
    #[error("Invalid client config: {0}")]
    ConfigError(String),
    #[error("While getting current time: {0:?}")]
    CurrentTime(Box<dyn error::Error + Send + Sync>),
    #[error("While getting last block time: {0:?}")]
    FailedToGetBlockTime(Box<dyn error::Error + Send + Sync>),
}

#[allow(missing_docs)]
pub type ChainClientResult<T> = Result<T, ChainClientError>;
