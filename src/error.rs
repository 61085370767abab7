use crate::{
    asset_id::AssetId, chain_client::ChainClientError, contract::ContractError,
    logic::error::LogicError,
};
use std::error;
use thiserror::Error;

#[allow(missing_docs)]
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("ChainClient Error: {0}")]
    ChainClient(#[from] ChainClientError),
    #[error("ContractLogic Error: {0}")]
    Logic(#[from] LogicError),
    #[error("ContractCode Error: {0}")]
    Contract(#[from] ContractError),
    #[error("Error: Insufficient amount of {0:?}.")]
    InsufficientAmountOf(AssetId),
    #[error("Devnet Error: {0}")]
    Devnet(String),
    #[error("TOML Error: {0:?}")]
    Toml(Box<dyn error::Error + Send + Sync>),
}
