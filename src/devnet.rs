//! Configuration for the locally-persisted development chain, stored under a
//! config folder in the user's home directory.

use crate::{
    address::Address,
    chain_client::test_chain_client::{
        local_persisted_storage::LocalPersistedStorage, TestChainClient,
    },
    error::{Error, Result},
};
use dirs::home_dir;
use serde::{de::DeserializeOwned, ser, Deserialize, Serialize};
use std::{fmt::Debug, path::PathBuf};
use thiserror::Error as ThisError;
use tokio::{fs, io::AsyncWriteExt};

/// Folder under the home directory holding devnet configuration
pub const DEVNET_CONFIG_FOLDER: &str = ".dromon";
/// Name of the devnet config file
pub const DEVNET_CONFIG_FILE: &str = "config.toml";

/// Path of the devnet config folder
pub fn path_to_devnet_config_dir() -> Result<PathBuf> {
    let mut dir = home_dir()
        .ok_or_else(|| Error::Devnet("Could not find home directory".to_string()))?;
    dir.push(DEVNET_CONFIG_FOLDER);
    Ok(dir)
}

/// Path of the devnet config file
pub fn path_to_devnet_config_file() -> Result<PathBuf> {
    let mut dir = path_to_devnet_config_dir()?;
    dir.push(DEVNET_CONFIG_FILE);
    Ok(dir)
}

/// On-disk description of the local devnet
#[derive(Deserialize, Serialize, Clone)]
pub struct DevnetConfig {
    /// Directory holding the chain's data file
    pub chain_dir: PathBuf,
    /// Bech32 address of the account funded at chain creation
    pub signer: String,
    /// Base-coin amount the signer starts with
    pub starting_coin: u64,
}

impl DevnetConfig {
    /// Constructor for a `DevnetConfig`
    pub fn new(chain_dir: PathBuf, signer: &Address, starting_coin: u64) -> Self {
        DevnetConfig {
            chain_dir,
            signer: signer.to_bech32(),
            starting_coin,
        }
    }
}

/// Write the devnet config file, creating the config folder if needed
pub async fn init_devnet(config: &DevnetConfig) -> Result<()> {
    let path = path_to_devnet_config_file()?;
    write_toml_struct_to_file(&path, config).await?;
    fs::create_dir_all(&config.chain_dir)
        .await
        .map_err(|e| Error::Devnet(e.to_string()))?;
    Ok(())
}

/// Build a chain client for the devnet described by the config file. Creates
/// the chain with the configured funded signer on first use.
pub async fn get_devnet_chain_client_from_file<State, Call>(
) -> Result<TestChainClient<State, Call, LocalPersistedStorage<PathBuf, State>>>
where
    State: Clone + Eq + Debug + Send + Sync + Serialize + DeserializeOwned,
    Call: Clone + Eq + Debug + Send + Sync,
{
    let config_path = path_to_devnet_config_file()?;
    let config = read_toml_struct_from_file::<DevnetConfig>(&config_path)
        .await?
        .ok_or_else(|| Error::Devnet("Devnet not initialized (config not found)".to_string()))?;
    let signer = Address::from_bech32(&config.signer)
        .map_err(|e| Error::Devnet(format!("Bad signer address in config: {e}")))?;
    let client =
        TestChainClient::new_local_persisted(config.chain_dir, &signer, config.starting_coin);
    Ok(client)
}

#[allow(missing_docs)]
#[derive(Debug, ThisError)]
pub enum TomlError {
    #[error("No parent directory for config file: {0:?}")]
    NoParentDir(String),
}

/// Serialize `toml_struct` to `file_path` as TOML, creating parent folders
pub async fn write_toml_struct_to_file<Toml: ser::Serialize>(
    file_path: &PathBuf,
    toml_struct: &Toml,
) -> Result<()> {
    let serialized = toml::to_string(&toml_struct).map_err(|e| Error::Toml(Box::new(e)))?;
    let parent_dir = file_path
        .parent()
        .ok_or_else(|| TomlError::NoParentDir(format!("{file_path:?}")))
        .map_err(|e| Error::Toml(Box::new(e)))?;
    fs::create_dir_all(&parent_dir)
        .await
        .map_err(|e| Error::Toml(Box::new(e)))?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&file_path)
        .await
        .map_err(|e| Error::Toml(Box::new(e)))?;
    file.write_all(&serialized.into_bytes())
        .await
        .map_err(|e| Error::Toml(Box::new(e)))?;
    Ok(())
}

/// Deserialize a TOML file at `file_path`, if it exists
pub async fn read_toml_struct_from_file<Toml: DeserializeOwned>(
    file_path: &PathBuf,
) -> Result<Option<Toml>> {
    if file_path.exists() {
        let contents = fs::read_to_string(file_path)
            .await
            .map_err(|e| Error::Toml(Box::new(e)))?;
        let toml_struct = toml::from_str(&contents).map_err(|e| Error::Toml(Box::new(e)))?;
        Ok(Some(toml_struct))
    } else {
        Ok(None)
    }
}
