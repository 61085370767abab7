use crate::chain_client::test_chain_client::{TestChainError, TestChainStorage};
use crate::chain_client::{ChainClientError, ChainClientResult};
use crate::values::Values;
use crate::Address;
use std::sync::{Arc, Mutex};

type MutableData<T> = Arc<Mutex<T>>;

/// Whole-chain storage held in memory behind mutexes, so clients can be
/// shared across tasks within a test
#[derive(Debug)]
pub struct InMemoryStorage<State> {
    signer: MutableData<Address>,
    accounts: MutableData<Vec<(Address, Values)>>,
    contracts: MutableData<Vec<(Address, State)>>,
    current_posix_time: MutableData<i64>,
    block_length: i64,
}

impl<State> InMemoryStorage<State> {
    /// Constructor for a fresh chain with the given funded accounts
    pub fn new(signer: Address, accounts: Vec<(Address, Values)>, block_length: i64) -> Self {
        InMemoryStorage {
            signer: Arc::new(Mutex::new(signer)),
            accounts: Arc::new(Mutex::new(accounts)),
            contracts: Arc::new(Mutex::new(Vec::new())),
            current_posix_time: Arc::new(Mutex::new(0)),
            block_length,
        }
    }
}

#[async_trait::async_trait]
impl<State: Clone + Send + Sync + PartialEq> TestChainStorage<State> for InMemoryStorage<State> {
    async fn signer(&self) -> ChainClientResult<Address> {
        let signer = self
            .signer
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?
            .clone();
        Ok(signer)
    }

    async fn set_signer(&self, address: &Address) -> ChainClientResult<()> {
        let mut signer = self
            .signer
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?;
        *signer = address.clone();
        Ok(())
    }

    async fn accounts(&self) -> ChainClientResult<Vec<Address>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::FailedToSubmitTx(Box::new(e)))?
            .iter()
            .map(|(a, _)| a.clone())
            .collect();
        Ok(accounts)
    }

    async fn values_at_address(&self, address: &Address) -> ChainClientResult<Values> {
        let values = self
            .accounts
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| {
                ChainClientError::FailedToRetrieveAccountAt(address.clone(), Box::new(e))
            })?
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        Ok(values)
    }

    async fn set_values(&self, address: &Address, values: &Values) -> ChainClientResult<()> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| {
                ChainClientError::FailedToRetrieveAccountAt(address.clone(), Box::new(e))
            })?;
        if let Some(entry) = accounts.iter_mut().find(|(a, _)| a == address) {
            entry.1 = values.clone();
        } else {
            accounts.push((address.clone(), values.clone()));
        }
        Ok(())
    }

    async fn contract_state(&self, address: &Address) -> ChainClientResult<Option<State>> {
        let state = self
            .contracts
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::FailedToRetrieveStateAt(address.clone(), Box::new(e)))?
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, s)| s.clone());
        Ok(state)
    }

    async fn store_contract_state(
        &self,
        address: &Address,
        state: &State,
    ) -> ChainClientResult<()> {
        let mut contracts = self
            .contracts
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::FailedToRetrieveStateAt(address.clone(), Box::new(e)))?;
        if let Some(entry) = contracts.iter_mut().find(|(a, _)| a == address) {
            entry.1 = state.clone();
        } else {
            contracts.push((address.clone(), state.clone()));
        }
        Ok(())
    }

    async fn current_time(&self) -> ChainClientResult<i64> {
        let time = *self
            .current_posix_time
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::CurrentTime(Box::new(e)))?;
        Ok(time)
    }

    async fn set_current_time(&self, posix_time: i64) -> ChainClientResult<()> {
        let mut time = self
            .current_posix_time
            .lock()
            .map_err(|e| TestChainError::Mutex(format! {"{e:?}"}))
            .map_err(|e| ChainClientError::CurrentTime(Box::new(e)))?;
        *time = posix_time;
        Ok(())
    }

    async fn get_block_length(&self) -> ChainClientResult<i64> {
        Ok(self.block_length)
    }
}
