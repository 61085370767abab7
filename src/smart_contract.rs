use async_trait::async_trait;

use crate::{
    chain_client::ChainClient, error::Result, logic::ContractLogic, transaction::TxId,
};

/// Interface for an offchain handle to a deployed (or deployable) contract
#[async_trait]
pub trait SmartContractTrait {
    /// The transaction-producing calls the contract exposes
    type Endpoints;
    /// The read-only queries the contract exposes
    type Lookups;
    /// Responses to the read-only queries
    type LookupResponses;

    /// Build and submit the transaction for the given endpoint request
    async fn hit_endpoint(&self, endpoint: Self::Endpoints) -> Result<TxId>;

    /// Answer the given read-only query
    async fn lookup(&self, lookup: Self::Lookups) -> Result<Self::LookupResponses>;
}

/// Ties a [`ContractLogic`] to a [`ChainClient`] so endpoints and lookups can
/// be driven against a live chain
#[derive(Debug)]
pub struct SmartContract<Logic, CC>
where
    Logic: ContractLogic,
    CC: ChainClient<Logic::State, Logic::Call>,
{
    /// The contract's offchain logic
    pub logic: Logic,
    /// The chain the contract is driven against
    pub chain_client: CC,
}

impl<Logic, CC> SmartContract<Logic, CC>
where
    Logic: ContractLogic,
    CC: ChainClient<Logic::State, Logic::Call>,
{
    /// Constructor for a `SmartContract`
    pub fn new(logic: Logic, chain_client: CC) -> Self {
        SmartContract {
            logic,
            chain_client,
        }
    }

    /// Getter for the underlying chain client
    pub fn chain_client(&self) -> &CC {
        &self.chain_client
    }
}

#[async_trait]
impl<Logic, CC> SmartContractTrait for SmartContract<Logic, CC>
where
    Logic: ContractLogic + Send + Sync,
    CC: ChainClient<Logic::State, Logic::Call> + Send + Sync,
{
    type Endpoints = Logic::Endpoints;
    type Lookups = Logic::Lookups;
    type LookupResponses = Logic::LookupResponses;

    async fn hit_endpoint(&self, endpoint: Logic::Endpoints) -> Result<TxId> {
        let tx_actions = Logic::handle_endpoint(endpoint, &self.chain_client).await?;
        let tx = tx_actions.to_unbuilt_tx();
        let tx_id = self.chain_client.submit(tx).await?;
        tracing::info!("Submitted transaction: {:?}", tx_id);
        Ok(tx_id)
    }

    async fn lookup(&self, lookup: Self::Lookups) -> Result<Self::LookupResponses> {
        Ok(Logic::lookup(lookup, &self.chain_client).await?)
    }
}
