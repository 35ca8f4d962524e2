//! Sui Address Encoding
//!
//! Sui account addresses and object ids share one representation: 32 raw
//! bytes. The canonical text form is `0x` followed by 64 lowercase hex
//! characters. Shorter hex strings are accepted and left-padded with zeros,
//! so the clock object can be written as `0x6`.
//!
//! ## Serialization
//!
//! - Human-readable formats (JSON): canonical hex string
//! - BCS: the 32 bytes, without a length prefix

use eyre::{eyre, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a Sui address in bytes
pub const SUI_ADDRESS_LENGTH: usize = 32;

/// A 32-byte Sui account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

/// Object ids use the address representation
pub type ObjectId = SuiAddress;

impl SuiAddress {
    /// The all-zero address
    pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);

    /// Create from raw bytes
    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create an address whose only non-zero byte is the last one.
    ///
    /// Used for the framework's well-known objects (`0x2`, `0x6`, ...).
    pub const fn from_low_byte(byte: u8) -> Self {
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        bytes[SUI_ADDRESS_LENGTH - 1] = byte;
        Self(bytes)
    }

    /// Parse from a hex string, with or without `0x`, short forms allowed
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.is_empty() {
            return Err(eyre!("Empty Sui address"));
        }
        if hex_part.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(eyre!(
                "Sui address too long: {} hex characters (max {})",
                hex_part.len(),
                SUI_ADDRESS_LENGTH * 2
            ));
        }

        let padded = format!("{:0>64}", hex_part);
        let bytes = hex::decode(&padded)
            .map_err(|e| eyre!("Invalid hex in Sui address '{}': {}", trimmed, e))?;
        Self::from_bytes(&bytes)
    }

    /// Create from a byte slice that must be exactly 32 bytes long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SUI_ADDRESS_LENGTH {
            return Err(eyre!(
                "Sui address must be {} bytes, got {}",
                SUI_ADDRESS_LENGTH,
                bytes.len()
            ));
        }
        let mut result = [0u8; SUI_ADDRESS_LENGTH];
        result.copy_from_slice(bytes);
        Ok(Self(result))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    /// Canonical `0x` + 64 hex characters
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Hex with leading zeros stripped (`0x6` for the clock)
    pub fn to_short_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<[u8; SUI_ADDRESS_LENGTH]> for SuiAddress {
    fn from(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(de::Error::custom)
        } else {
            let bytes = <[u8; SUI_ADDRESS_LENGTH]>::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}
