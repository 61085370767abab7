use bech32::{FromBase32, ToBase32, Variant};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Length in bytes of the hash payload of an [`Address`]
pub const ADDRESS_LENGTH: usize = 20;

const ADDRESS_HRP: &str = "addr";

/// Identity of an account or a deployed contract on the chain. The payload is
/// an opaque 20-byte hash, rendered as bech32 for display, user input, and
/// serialization.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    bytes: [u8; ADDRESS_LENGTH],
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Bad bech32 encoding: {0}")]
    BadEncoding(String),
    #[error("Unexpected address prefix: {0}")]
    UnexpectedHrp(String),
    #[error("Expected {ADDRESS_LENGTH} byte payload, found {0} bytes")]
    BadLength(usize),
}

impl Address {
    /// Constructor for an `Address` from its raw payload
    pub fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address { bytes }
    }

    /// Constructor for an `Address` from a byte slice of the right length
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::BadLength(bytes.len()))?;
        Ok(Address { bytes })
    }

    /// Parse a bech32-rendered `Address`
    pub fn from_bech32(addr: &str) -> Result<Self, AddressError> {
        let (hrp, data, _) =
            bech32::decode(addr).map_err(|e| AddressError::BadEncoding(e.to_string()))?;
        if hrp != ADDRESS_HRP {
            return Err(AddressError::UnexpectedHrp(hrp));
        }
        let bytes =
            Vec::<u8>::from_base32(&data).map_err(|e| AddressError::BadEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Render the `Address` as bech32
    pub fn to_bech32(&self) -> String {
        bech32::encode(ADDRESS_HRP, self.bytes.to_base32(), Variant::Bech32)
            .expect("HRP is valid")
    }

    /// Getter for the raw payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render the raw payload as lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_bech32())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_bech32(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bech32_round_trip() {
        let address = Address::new([7; ADDRESS_LENGTH]);
        let encoded = address.to_bech32();
        let decoded = Address::from_bech32(&encoded).unwrap();
        assert_eq!(address, decoded);
    }

    #[test]
    fn rejects_wrong_payload_length() {
        let err = Address::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, AddressError::BadLength(3)));
    }

    #[test]
    fn rejects_foreign_prefix() {
        let encoded =
            bech32::encode("stake", [7u8; ADDRESS_LENGTH].to_base32(), Variant::Bech32).unwrap();
        let err = Address::from_bech32(&encoded).unwrap_err();
        assert!(matches!(err, AddressError::UnexpectedHrp(_)));
    }

    #[test]
    fn serde_as_bech32_string() {
        let address = Address::new([42; ADDRESS_LENGTH]);
        let serialized = serde_json::to_string(&address).unwrap();
        assert_eq!(serialized, format!("\"{}\"", address.to_bech32()));
        let deserialized: Address = serde_json::from_str(&serialized).unwrap();
        assert_eq!(address, deserialized);
    }
}
