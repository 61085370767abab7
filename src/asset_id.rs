use serde::{Deserialize, Serialize};

/// Token identity.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub enum AssetId {
    /// The chain's base coin
    Coin,
    /// Token issued by the contract with the given hex-rendered address, with
    /// optional asset name
    Token(String, Option<String>),
}

impl AssetId {
    /// Constructor for the base coin asset id
    pub fn coin() -> AssetId {
        AssetId::Coin
    }

    /// Constructor for a contract-issued token asset id
    pub fn token(id: &str, asset: &Option<String>) -> AssetId {
        AssetId::Token(id.to_string(), asset.to_owned())
    }

    /// Getter for the issuing contract id
    pub fn id(&self) -> String {
        match self {
            AssetId::Coin => "".to_string(),
            AssetId::Token(id, _) => id.clone(),
        }
    }

    /// Getter for asset name
    pub fn asset_name(&self) -> Option<String> {
        match self {
            AssetId::Coin => None,
            AssetId::Token(_, asset_name) => asset_name.to_owned(),
        }
    }
}
