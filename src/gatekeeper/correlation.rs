//! Correlation ID - the token identifier (`jti`) minted at issuance.
//!
//! 12 bytes rendered as 24 lowercase hex characters:
//! 4 bytes of big-endian issuance seconds followed by 8 random bytes.
//! The layout keeps ids roughly time-ordered in the credential store.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const CORRELATION_ID_LEN: usize = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid correlation id: {0}")]
pub struct ParseCorrelationIdError(String);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId([u8; CORRELATION_ID_LEN]);

impl CorrelationId {
    /// Mint a new id for an issuance at `unix_secs`.
    pub fn generate(unix_secs: i64) -> Self {
        let mut bytes = [0u8; CORRELATION_ID_LEN];
        bytes[..4].copy_from_slice(&(unix_secs as u32).to_be_bytes());
        bytes[4..].copy_from_slice(&rand::random::<[u8; 8]>());
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; CORRELATION_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CORRELATION_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = ParseCorrelationIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CORRELATION_ID_LEN * 2 {
            return Err(ParseCorrelationIdError(s.to_string()));
        }
        let mut bytes = [0u8; CORRELATION_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseCorrelationIdError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.to_hex())
    }
}

impl Serialize for CorrelationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CorrelationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let id = CorrelationId::generate(1_700_000_000);
        let hex = id.to_string();
        assert_eq!(hex.len(), 24);
        assert_eq!(hex.parse::<CorrelationId>().unwrap(), id);
    }

    #[test]
    fn test_timestamp_prefix() {
        let id = CorrelationId::generate(0x5f8f8ccb);
        assert!(id.to_string().starts_with("5f8f8ccb"));
    }

    #[test]
    fn test_unique() {
        let a = CorrelationId::generate(1);
        let b = CorrelationId::generate(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!("".parse::<CorrelationId>().is_err());
        assert!("5f8f8ccb30a1cd7511c5cb7".parse::<CorrelationId>().is_err());
        assert!("zz8f8ccb30a1cd7511c5cb70".parse::<CorrelationId>().is_err());
        assert!("5f8f8ccb30a1cd7511c5cb7000".parse::<CorrelationId>().is_err());
        assert!("5f8f8ccb30a1cd7511c5cb70".parse::<CorrelationId>().is_ok());
    }
}
