use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    marker::PhantomData,
    path::Path,
};

use crate::{
    address::Address,
    asset_id::AssetId,
    chain_client::{
        test_chain_client::{TestChainError, TestChainStorage},
        ChainClientError, ChainClientResult,
    },
    values::Values,
};

/// Serialized snapshot of the whole chain
#[derive(Serialize, Deserialize, Debug)]
pub(crate) struct ChainData<State> {
    signer: Address,
    accounts: Vec<(Address, Values)>,
    contracts: Vec<(Address, State)>,
    current_posix_time: i64,
    block_length: i64,
}

impl<State> ChainData<State> {
    pub fn new(signer: Address, starting_amount: u64, block_length: i64) -> Self {
        let mut values = Values::default();
        values.add_one_value(&AssetId::Coin, starting_amount);
        ChainData {
            signer: signer.clone(),
            accounts: vec![(signer, values)],
            contracts: Vec::new(),
            current_posix_time: 0,
            block_length,
        }
    }
}

/// Chain storage persisted as a single JSON data file under `dir`, so a local
/// dev chain survives process restarts
pub struct LocalPersistedStorage<T: AsRef<Path>, State> {
    dir: T,
    _state: PhantomData<State>,
}

const DATA: &str = "data";

impl<T, State> LocalPersistedStorage<T, State>
where
    T: AsRef<Path>,
    State: Serialize + DeserializeOwned,
{
    /// Create the chain file with a single funded signer account if it
    /// doesn't exist yet, and return storage over it
    pub fn init(dir: T, signer: &Address, starting_amount: u64, block_length: i64) -> Self {
        let path = dir.as_ref().join(DATA);
        if !path.exists() {
            let data = ChainData::<State>::new(signer.clone(), starting_amount, block_length);
            let serialized = serde_json::to_string(&data).expect("Always serializable");
            let mut file = File::create(path).expect("Could not create data file");
            file.write_all(&serialized.into_bytes())
                .expect("Could not write data file");
        }

        LocalPersistedStorage {
            dir,
            _state: PhantomData,
        }
    }

    /// Storage over an existing chain file
    pub fn load(dir: T) -> Self {
        LocalPersistedStorage {
            dir,
            _state: PhantomData,
        }
    }

    fn get_data(&self) -> ChainClientResult<ChainData<State>> {
        let path = self.dir.as_ref().join(DATA);
        let mut file = File::open(&path)
            .map_err(|e| TestChainError::DataFile(e.to_string()))
            .map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        let data = serde_json::from_str(&contents)
            .map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        Ok(data)
    }

    fn update_data(&self, data: &ChainData<State>) -> ChainClientResult<()> {
        let path = self.dir.as_ref().join(DATA);
        let serialized =
            serde_json::to_string(data).map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        let mut file =
            File::create(&path).map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        file.write_all(&serialized.into_bytes())
            .map_err(|e| ChainClientError::ConfigError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T, State> TestChainStorage<State> for LocalPersistedStorage<T, State>
where
    T: AsRef<Path> + Send + Sync,
    State: Clone + Send + Sync + Serialize + DeserializeOwned + PartialEq,
{
    async fn signer(&self) -> ChainClientResult<Address> {
        let signer = self.get_data()?.signer;
        Ok(signer)
    }

    async fn set_signer(&self, address: &Address) -> ChainClientResult<()> {
        let mut data = self.get_data()?;
        data.signer = address.clone();
        self.update_data(&data)
    }

    async fn accounts(&self) -> ChainClientResult<Vec<Address>> {
        let accounts = self
            .get_data()?
            .accounts
            .into_iter()
            .map(|(a, _)| a)
            .collect();
        Ok(accounts)
    }

    async fn values_at_address(&self, address: &Address) -> ChainClientResult<Values> {
        let values = self
            .get_data()?
            .accounts
            .into_iter()
            .find(|(a, _)| a == address)
            .map(|(_, v)| v)
            .unwrap_or_default();
        Ok(values)
    }

    async fn set_values(&self, address: &Address, values: &Values) -> ChainClientResult<()> {
        let mut data = self.get_data()?;
        if let Some(entry) = data.accounts.iter_mut().find(|(a, _)| a == address) {
            entry.1 = values.clone();
        } else {
            data.accounts.push((address.clone(), values.clone()));
        }
        self.update_data(&data)
    }

    async fn contract_state(&self, address: &Address) -> ChainClientResult<Option<State>> {
        let state = self
            .get_data()?
            .contracts
            .into_iter()
            .find(|(a, _)| a == address)
            .map(|(_, s)| s);
        Ok(state)
    }

    async fn store_contract_state(
        &self,
        address: &Address,
        state: &State,
    ) -> ChainClientResult<()> {
        let mut data = self.get_data()?;
        if let Some(entry) = data.contracts.iter_mut().find(|(a, _)| a == address) {
            entry.1 = state.clone();
        } else {
            data.contracts.push((address.clone(), state.clone()));
        }
        self.update_data(&data)
    }

    async fn current_time(&self) -> ChainClientResult<i64> {
        let time = self.get_data()?.current_posix_time;
        Ok(time)
    }

    async fn set_current_time(&self, posix_time: i64) -> ChainClientResult<()> {
        let mut data = self.get_data()?;
        data.current_posix_time = posix_time;
        self.update_data(&data)
    }

    async fn get_block_length(&self) -> ChainClientResult<i64> {
        let block_length = self.get_data()?.block_length;
        Ok(block_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::ADDRESS_LENGTH;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_seeds_signer_with_starting_amount() {
        let tmp_dir = TempDir::new().unwrap();
        let signer = Address::new([1; ADDRESS_LENGTH]);
        let starting_amount = 10_000_000;
        let storage: LocalPersistedStorage<_, ()> =
            LocalPersistedStorage::init(tmp_dir.path(), &signer, starting_amount, 1000);

        let values = storage.values_at_address(&signer).await.unwrap();
        assert_eq!(values.get(&AssetId::Coin), Some(starting_amount));
        assert_eq!(storage.signer().await.unwrap(), signer);
    }

    #[tokio::test]
    async fn reinit_does_not_clobber_existing_chain() {
        let tmp_dir = TempDir::new().unwrap();
        let signer = Address::new([1; ADDRESS_LENGTH]);
        let storage: LocalPersistedStorage<_, ()> =
            LocalPersistedStorage::init(tmp_dir.path(), &signer, 500, 1000);
        storage.set_current_time(123_456).await.unwrap();

        let reloaded: LocalPersistedStorage<_, ()> =
            LocalPersistedStorage::init(tmp_dir.path(), &signer, 99, 1000);
        assert_eq!(reloaded.current_time().await.unwrap(), 123_456);
        let values = reloaded.values_at_address(&signer).await.unwrap();
        assert_eq!(values.get(&AssetId::Coin), Some(500));
    }

    #[tokio::test]
    async fn state_survives_reload() {
        let tmp_dir = TempDir::new().unwrap();
        let signer = Address::new([2; ADDRESS_LENGTH]);
        let contract_address = Address::new([9; ADDRESS_LENGTH]);
        let storage: LocalPersistedStorage<_, u64> =
            LocalPersistedStorage::init(tmp_dir.path(), &signer, 500, 1000);
        storage
            .store_contract_state(&contract_address, &42)
            .await
            .unwrap();

        let reloaded: LocalPersistedStorage<_, u64> = LocalPersistedStorage::load(tmp_dir.path());
        let state = reloaded.contract_state(&contract_address).await.unwrap();
        assert_eq!(state, Some(42));
    }
}
