use crate::contract::{contract_address, MembershipCall, MembershipContract, MembershipState};
use async_trait::async_trait;
use dromon::{
    chain_client::ChainClient,
    logic::{
        error::{as_lookup_err, LogicResult},
        ContractLogic,
    },
    transaction::TxActions,
    Address,
};
use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MembershipLogic;

#[derive(Debug)]
pub enum MembershipEndpoints {
    /// Deploy a fresh contract administered by the signer
    Deploy { name: String, symbol: String },
    /// Register a batch of members
    AddMembers { members: Vec<Address> },
    /// Store the shared metadata URI prefix
    SetBaseUri { base_uri: String },
    /// Mint the signer's token through the admin gate
    MintAdmin,
    /// Mint the signer's token through the membership gate
    Mint,
}

#[derive(Debug)]
pub enum MembershipLookups {
    BalanceOf { address: Address },
    IsMember { address: Address },
    BaseUri,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MembershipLookupResponses {
    Balance(u64),
    IsMember(bool),
    BaseUri(Option<String>),
}

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("No membership contract deployed at: {0:?}")]
    NotDeployed(Address),
}

#[async_trait]
impl ContractLogic for MembershipLogic {
    type Endpoints = MembershipEndpoints;
    type Lookups = MembershipLookups;
    type LookupResponses = MembershipLookupResponses;
    type State = MembershipState;
    type Call = MembershipCall;

    async fn handle_endpoint<CC: ChainClient<Self::State, Self::Call>>(
        endpoint: Self::Endpoints,
        chain_client: &CC,
    ) -> LogicResult<TxActions<Self::State, Self::Call>> {
        match endpoint {
            MembershipEndpoints::Deploy { name, symbol } => {
                impl_deploy(chain_client, &name, &symbol).await
            }
            MembershipEndpoints::AddMembers { members } => {
                impl_invoke(MembershipCall::AddMembers(members))
            }
            MembershipEndpoints::SetBaseUri { base_uri } => {
                impl_invoke(MembershipCall::SetBaseUri(base_uri))
            }
            MembershipEndpoints::MintAdmin => impl_invoke(MembershipCall::MintAdmin),
            MembershipEndpoints::Mint => impl_invoke(MembershipCall::Mint),
        }
    }

    async fn lookup<CC: ChainClient<Self::State, Self::Call>>(
        query: Self::Lookups,
        chain_client: &CC,
    ) -> LogicResult<Self::LookupResponses> {
        match query {
            MembershipLookups::BalanceOf { address } => {
                impl_balance_of(chain_client, &address).await
            }
            MembershipLookups::IsMember { address } => impl_is_member(chain_client, &address).await,
            MembershipLookups::BaseUri => impl_base_uri(chain_client).await,
        }
    }
}

async fn impl_deploy<CC: ChainClient<MembershipState, MembershipCall>>(
    chain_client: &CC,
    name: &str,
    symbol: &str,
) -> LogicResult<TxActions<MembershipState, MembershipCall>> {
    let admin = chain_client.signer_address().await?;
    let state = MembershipState::new(name, symbol, &admin);
    let actions = TxActions::default().with_deploy(state, Box::new(MembershipContract));
    Ok(actions)
}

fn impl_invoke(
    call: MembershipCall,
) -> LogicResult<TxActions<MembershipState, MembershipCall>> {
    let actions = TxActions::default().with_invoke(call, Box::new(MembershipContract));
    Ok(actions)
}

async fn lookup_state<CC: ChainClient<MembershipState, MembershipCall>>(
    chain_client: &CC,
) -> LogicResult<MembershipState> {
    let address = contract_address();
    chain_client
        .contract_state(&address)
        .await?
        .ok_or(MembershipError::NotDeployed(address))
        .map_err(as_lookup_err)
}

async fn impl_balance_of<CC: ChainClient<MembershipState, MembershipCall>>(
    chain_client: &CC,
    address: &Address,
) -> LogicResult<MembershipLookupResponses> {
    let state = lookup_state(chain_client).await?;
    let balance = chain_client
        .balance_at_address(address, &state.asset_id())
        .await?;
    Ok(MembershipLookupResponses::Balance(balance))
}

async fn impl_is_member<CC: ChainClient<MembershipState, MembershipCall>>(
    chain_client: &CC,
    address: &Address,
) -> LogicResult<MembershipLookupResponses> {
    let state = lookup_state(chain_client).await?;
    Ok(MembershipLookupResponses::IsMember(
        state.is_member(address),
    ))
}

async fn impl_base_uri<CC: ChainClient<MembershipState, MembershipCall>>(
    chain_client: &CC,
) -> LogicResult<MembershipLookupResponses> {
    let state = lookup_state(chain_client).await?;
    Ok(MembershipLookupResponses::BaseUri(state.base_uri))
}
