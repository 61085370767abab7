use crate::{chain_client::ChainClient, logic::error::LogicResult, transaction::TxActions};
use async_trait::async_trait;
use std::fmt::Debug;

/// Logic error module
pub mod error;

/// Interface for the offchain logic of a specific contract. The endpoint
/// handlers translate domain-level requests into [`TxActions`], and lookups
/// answer read-only queries against the chain.
#[async_trait]
pub trait ContractLogic {
    /// The transaction-producing calls the contract exposes
    type Endpoints: Send + Sync;
    /// The read-only queries the contract exposes
    type Lookups: Send + Sync;
    /// Responses to the read-only queries
    type LookupResponses: Send + Sync;
    /// The contract's stored state
    type State: Clone + Eq + Debug + Send + Sync;
    /// The call type the contract code executes
    type Call: Clone + Eq + Debug + Send + Sync;

    /// Build the transaction actions for the given endpoint request
    async fn handle_endpoint<CC: ChainClient<Self::State, Self::Call>>(
        endpoint: Self::Endpoints,
        chain_client: &CC,
    ) -> LogicResult<TxActions<Self::State, Self::Call>>;

    /// Answer the given read-only query
    async fn lookup<CC: ChainClient<Self::State, Self::Call>>(
        query: Self::Lookups,
        chain_client: &CC,
    ) -> LogicResult<Self::LookupResponses>;
}
