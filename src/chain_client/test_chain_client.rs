use std::{collections::HashMap, fmt::Debug, marker::PhantomData, path::Path};

use crate::{
    address::Address,
    asset_id::AssetId,
    chain_client::{ChainClient, ChainClientError, ChainClientResult},
    contract::{context::TxContext, Effect},
    transaction::{TxId, UnbuiltTransaction},
    values::Values,
};
use async_trait::async_trait;
use in_memory_storage::InMemoryStorage;
use local_persisted_storage::LocalPersistedStorage;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// In-memory chain storage module
pub mod in_memory_storage;
/// File-backed chain storage module
pub mod local_persisted_storage;

#[cfg(test)]
mod tests;

/// Builder for a test chain seeded with funded accounts. The accounts
/// registered here are the pool `signer_addresses` reports, and the first
/// argument to [`TestChainBuilder::new`] starts as the active signer.
pub struct TestChainBuilder<State, Call> {
    signer: Address,
    accounts: Vec<(Address, Values)>,
    _state: PhantomData<State>,
    _call: PhantomData<Call>,
}

impl<State, Call> TestChainBuilder<State, Call>
where
    State: Clone + Eq + Debug + Send + Sync,
    Call: Clone + Eq + Debug + Send + Sync,
{
    /// Constructor for a builder whose active signer is `signer`
    pub fn new(signer: &Address) -> TestChainBuilder<State, Call> {
        TestChainBuilder {
            signer: signer.clone(),
            accounts: vec![(signer.clone(), Values::default())],
            _state: PhantomData,
            _call: PhantomData,
        }
    }

    /// Start describing the holdings of an account
    pub fn start_account(self, owner: &Address) -> AccountBuilder<State, Call> {
        AccountBuilder {
            inner: self,
            owner: owner.clone(),
            values: Values::default(),
        }
    }

    fn add_account(&mut self, address: &Address, values: Values) {
        if let Some(entry) = self.accounts.iter_mut().find(|(a, _)| a == address) {
            entry.1.add_values(&values);
        } else {
            self.accounts.push((address.clone(), values));
        }
    }

    /// Build a chain client over in-memory storage
    pub fn build_in_memory(
        &self,
    ) -> TestChainClient<State, Call, InMemoryStorage<State>> {
        let block_length = 1000;
        TestChainClient::new_in_memory(self.signer.clone(), self.accounts.clone(), block_length)
    }
}

/// Builder for a single account's starting holdings
pub struct AccountBuilder<State, Call> {
    inner: TestChainBuilder<State, Call>,
    owner: Address,
    values: Values,
}

impl<State, Call> AccountBuilder<State, Call>
where
    State: Clone + Eq + Debug + Send + Sync,
    Call: Clone + Eq + Debug + Send + Sync,
{
    /// Add an amount of an asset to the account
    pub fn with_value(mut self, asset: AssetId, amount: u64) -> AccountBuilder<State, Call> {
        self.values.add_one_value(&asset, amount);
        self
    }

    /// Finish the account and return to the chain builder
    pub fn finish_account(self) -> TestChainBuilder<State, Call> {
        let AccountBuilder {
            mut inner,
            owner,
            values,
        } = self;
        inner.add_account(&owner, values);
        inner
    }
}

#[derive(Debug, Error)]
pub(crate) enum TestChainError {
    #[error("Mutex lock error: {0:?}")]
    Mutex(String),
    #[error("Not enough funds in signer account")]
    InsufficientFunds,
    #[error("No contract deployed at address: {0:?}")]
    NotDeployed(Address),
    #[error("Contract already deployed at address: {0:?}")]
    AlreadyDeployed(Address),
    #[error("Not a known signer account: {0:?}")]
    UnknownSigner(Address),
    #[error("Data file error: {0}")]
    DataFile(String),
}

/// Storage interface backing a [`TestChainClient`]
#[async_trait::async_trait]
pub trait TestChainStorage<State>: Send + Sync {
    /// The active signer
    async fn signer(&self) -> ChainClientResult<Address>;
    /// Replace the active signer
    async fn set_signer(&self, address: &Address) -> ChainClientResult<()>;
    /// All registered accounts
    async fn accounts(&self) -> ChainClientResult<Vec<Address>>;
    /// Holdings of the given account; empty for unknown accounts
    async fn values_at_address(&self, address: &Address) -> ChainClientResult<Values>;
    /// Overwrite the holdings of the given account
    async fn set_values(&self, address: &Address, values: &Values) -> ChainClientResult<()>;
    /// Stored contract state at the given address
    async fn contract_state(&self, address: &Address) -> ChainClientResult<Option<State>>;
    /// Install or replace contract state at the given address
    async fn store_contract_state(
        &self,
        address: &Address,
        state: &State,
    ) -> ChainClientResult<()>;
    /// Current posix time of the chain
    async fn current_time(&self) -> ChainClientResult<i64>;
    /// Set the current posix time of the chain
    async fn set_current_time(&self, posix_time: i64) -> ChainClientResult<()>;
    /// Seconds between blocks
    async fn get_block_length(&self) -> ChainClientResult<i64>;
}

/// Chain client for tests and local development. Contract code executes
/// synchronously at submission against the storage's contract states, and a
/// failing execution reverts the whole transaction.
#[derive(Debug)]
pub struct TestChainClient<State, Call, Storage: TestChainStorage<State>> {
    storage: Storage,
    _state: PhantomData<State>,
    _call: PhantomData<Call>,
}

impl<State, Call> TestChainClient<State, Call, InMemoryStorage<State>>
where
    State: Clone + Send + Sync + PartialEq,
{
    /// Constructor for a client over fresh in-memory storage
    pub fn new_in_memory(
        signer: Address,
        accounts: Vec<(Address, Values)>,
        block_length: i64,
    ) -> Self {
        let storage = InMemoryStorage::new(signer, accounts, block_length);
        TestChainClient {
            storage,
            _state: PhantomData,
            _call: PhantomData,
        }
    }
}

impl<T, State, Call> TestChainClient<State, Call, LocalPersistedStorage<T, State>>
where
    State: Clone + Send + Sync + PartialEq + Serialize + DeserializeOwned,
    T: AsRef<Path> + Send + Sync,
{
    /// Constructor for a client persisted under `dir`, funding `signer` with
    /// `starting_amount` of the base coin if the chain file doesn't exist yet
    pub fn new_local_persisted(dir: T, signer: &Address, starting_amount: u64) -> Self {
        let block_length = 1000;
        let storage = LocalPersistedStorage::init(dir, signer, starting_amount, block_length);
        TestChainClient {
            storage,
            _state: PhantomData,
            _call: PhantomData,
        }
    }

    /// Constructor for a client over an existing chain file under `dir`
    pub fn load_local_persisted(dir: T) -> Self {
        let storage = LocalPersistedStorage::load(dir);
        TestChainClient {
            storage,
            _state: PhantomData,
            _call: PhantomData,
        }
    }
}

impl<State, Call, Storage> TestChainClient<State, Call, Storage>
where
    State: Clone + Send + Sync + PartialEq,
    Storage: TestChainStorage<State> + Send + Sync,
{
    /// Current posix time of the chain
    pub async fn current_time(&self) -> ChainClientResult<i64> {
        self.storage.current_time().await
    }

    /// Set the current posix time of the chain
    pub async fn set_current_time(&self, posix_time: i64) -> ChainClientResult<()> {
        self.storage.set_current_time(posix_time).await
    }

    /// Move the chain's clock forward by one block
    pub async fn advance_time_one_block(&self) -> ChainClientResult<()> {
        let block_length = self.storage.get_block_length().await?;
        let current_time = self.storage.current_time().await?;
        let new_time = block_length + current_time;
        self.storage.set_current_time(new_time).await
    }

    /// Make `address` the active signer for subsequent transactions. Fails
    /// for accounts the chain doesn't know about.
    pub async fn switch_signer(&self, address: &Address) -> ChainClientResult<()> {
        let known = self.storage.accounts().await?;
        if !known.contains(address) {
            return Err(ChainClientError::BadAddress(Box::new(
                TestChainError::UnknownSigner(address.clone()),
            )));
        }
        self.storage.set_signer(address).await
    }
}

#[async_trait]
impl<State, Call, Storage> ChainClient<State, Call> for TestChainClient<State, Call, Storage>
where
    State: Clone + PartialEq + Debug + Send + Sync,
    Call: Clone + Eq + Debug + Send + Sync,
    Storage: TestChainStorage<State> + Send + Sync,
{
    async fn signer_address(&self) -> ChainClientResult<Address> {
        self.storage.signer().await
    }

    async fn signer_addresses(&self) -> ChainClientResult<Vec<Address>> {
        self.storage.accounts().await
    }

    async fn account_values(&self, address: &Address) -> ChainClientResult<Values> {
        self.storage.values_at_address(address).await
    }

    async fn contract_state(&self, address: &Address) -> ChainClientResult<Option<State>> {
        self.storage.contract_state(address).await
    }

    async fn submit(&self, tx: UnbuiltTransaction<State, Call>) -> ChainClientResult<TxId> {
        let signer = self.storage.signer().await?;
        let block_time = self.storage.current_time().await?;

        // Stage every state transition and balance change before touching
        // storage, so a revert leaves the chain untouched.
        let mut staged_states: Vec<(Address, State)> = Vec::new();
        let mut credits: HashMap<Address, Values> = HashMap::new();

        for (state, code) in tx.deploys.iter() {
            let address = code
                .address()
                .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?;
            let occupied = self.storage.contract_state(&address).await?.is_some()
                || staged_states.iter().any(|(a, _)| a == &address);
            if occupied {
                return Err(ChainClientError::FailedToSubmitTx(Box::new(
                    TestChainError::AlreadyDeployed(address),
                )));
            }
            staged_states.push((address, state.clone()));
        }

        for (call, code) in tx.invokes.iter() {
            let address = code
                .address()
                .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?;
            let current = match staged_states.iter().position(|(a, _)| a == &address) {
                Some(ix) => staged_states.remove(ix).1,
                None => self
                    .storage
                    .contract_state(&address)
                    .await?
                    .ok_or_else(|| {
                        ChainClientError::FailedToSubmitTx(Box::new(TestChainError::NotDeployed(
                            address.clone(),
                        )))
                    })?,
            };
            let ctx = TxContext {
                caller: signer.clone(),
                block_time,
            };
            let transition = code
                .execute(current, call.clone(), ctx)
                .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?;
            let (next, effects) = transition.into_parts();
            for effect in effects {
                match effect {
                    Effect::Mint {
                        amount,
                        asset_name,
                        recipient,
                    } => {
                        let asset_id = AssetId::token(&address.to_hex(), &asset_name);
                        credits
                            .entry(recipient)
                            .or_default()
                            .add_one_value(&asset_id, amount);
                    }
                }
            }
            staged_states.push((address, next));
        }

        let mut debit_total = Values::default();
        for (amount, recipient, asset_id) in tx.transfers.iter() {
            debit_total.add_one_value(asset_id, *amount);
            credits
                .entry(recipient.clone())
                .or_default()
                .add_one_value(asset_id, *amount);
        }

        let signer_values = self.storage.values_at_address(&signer).await?;
        let signer_remainder = signer_values
            .try_subtract(&debit_total)
            .map_err(|_| TestChainError::InsufficientFunds)
            .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?;

        // Commit
        self.storage.set_values(&signer, &signer_remainder).await?;
        for (address, values) in credits {
            let mut current = self.storage.values_at_address(&address).await?;
            current.add_values(&values);
            self.storage.set_values(&address, &current).await?;
        }
        for (address, state) in staged_states {
            self.storage.store_contract_state(&address, &state).await?;
        }

        self.advance_time_one_block().await?;

        let tx_id = TxId::new(&hex::encode(arbitrary_tx_id()));
        tracing::debug!("Applied transaction: {:?}", tx_id);
        Ok(tx_id)
    }

    async fn last_block_time_secs(&self) -> ChainClientResult<i64> {
        self.storage.current_time().await
    }

    async fn current_time_secs(&self) -> ChainClientResult<i64> {
        self.storage.current_time().await
    }
}

fn arbitrary_tx_id() -> [u8; 32] {
    rand::thread_rng().gen()
}
