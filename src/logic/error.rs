use crate::{chain_client::ChainClientError, contract::ContractError};
use std::error;
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LogicError {
    #[error("Error handling endpoint: {0:?}")]
    Endpoint(Box<dyn error::Error + Send + Sync>),
    #[error("Error doing lookup: {0:?}")]
    Lookup(Box<dyn error::Error + Send + Sync>),
    #[error("Error from Contract Code: {0:?}")]
    ContractCode(#[from] ContractError),
    #[error("From ChainClient: {0:?}")]
    ChainClient(#[from] ChainClientError),
}

#[allow(missing_docs)]
pub type LogicResult<T> = crate::error::Result<T, LogicError>;

/// Wrap an arbitrary error as an endpoint-handling failure
pub fn as_endpoint_err<E: error::Error + Send + Sync + 'static>(error: E) -> LogicError {
    LogicError::Endpoint(Box::new(error))
}

/// Wrap an arbitrary error as a lookup failure
pub fn as_lookup_err<E: error::Error + Send + Sync + 'static>(error: E) -> LogicError {
    LogicError::Lookup(Box::new(error))
}
