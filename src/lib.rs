#![warn(missing_docs)]

//! Dromon Offchain Smart Contract Framework!

pub use crate::address::Address;

/// Crate-wide error module
pub mod error;

/// Account and contract address module
pub mod address;
/// `AssetId` type module
pub mod asset_id;
/// Chain client module
pub mod chain_client;
/// Contract code execution module
pub mod contract;
/// Local devnet configuration module
pub mod devnet;
/// Smart contract logic module
pub mod logic;
/// Smart contract driver module
pub mod smart_contract;
/// Transaction building module
pub mod transaction;
/// Multi-asset `Values` type module
pub mod values;
