//! Common types for Sui operations
//!
//! Digests, object references, network selection and the framework objects the
//! coin locker touches.

use eyre::{eyre, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::address::{ObjectId, SuiAddress};

// ============================================================================
// Well-known objects
// ============================================================================

/// The Sui framework package (`0x2`)
pub const SUI_FRAMEWORK_ADDRESS: SuiAddress = SuiAddress::from_low_byte(2);

/// The shared clock object (`0x6`)
pub const SUI_CLOCK_OBJECT_ID: ObjectId = SuiAddress::from_low_byte(6);

/// The clock was created at genesis with version 1
pub const SUI_CLOCK_OBJECT_SHARED_VERSION: SequenceNumber = 1;

/// Coin type of the gas coin
pub const GAS_COIN_TYPE: &str = "0x2::sui::SUI";

/// 1 SUI = 10^9 MIST
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Object version
pub type SequenceNumber = u64;

// ============================================================================
// Digest (32 bytes, base58)
// ============================================================================

/// A 32-byte Blake2b digest, displayed in base58
///
/// In BCS the digest is written as a length-prefixed byte vector, matching
/// the on-chain encoding of object and transaction digests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest([u8; 32]);

/// Digest of an object version
pub type ObjectDigest = Digest;

/// Digest of a transaction
pub type TransactionDigest = Digest;

impl Digest {
    /// Create from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from base58
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| eyre!("Invalid base58 digest '{}': {}", s, e))?;
        Self::from_slice(&bytes)
    }

    /// Create from a 32-byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(eyre!("Digest must be 32 bytes, got {}", bytes.len()));
        }
        let mut result = [0u8; 32];
        result.copy_from_slice(bytes);
        Ok(Self(result))
    }

    /// Encode as base58
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_base58())
    }
}

impl FromStr for Digest {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base58())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_base58(&s).map_err(de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Self::from_slice(&bytes).map_err(de::Error::custom)
        }
    }
}

// ============================================================================
// Object reference
// ============================================================================

/// Reference to a specific version of an owned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectId, version: SequenceNumber, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

// ============================================================================
// Network
// ============================================================================

/// Sui network selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    #[default]
    Testnet,
    Mainnet,
    Localnet,
}

impl Network {
    /// All supported networks
    pub const ALL: [Network; 4] = [
        Network::Devnet,
        Network::Testnet,
        Network::Mainnet,
        Network::Localnet,
    ];

    /// Get the network as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Localnet => "localnet",
        }
    }

    /// Public fullnode JSON-RPC endpoint
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(eyre!(
                "Unknown network '{}': expected devnet, testnet, mainnet or localnet",
                other
            )),
        }
    }
}
