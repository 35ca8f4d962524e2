//! Sui Transaction Signing Module
//!
//! Ed25519 account keys in the formats the Sui CLI and wallets export:
//!
//! - `suiprivkey1...` - bech32, payload `flag ‖ secret`
//! - base64 of `flag ‖ secret` (33 bytes), as found in `sui.keystore`
//! - base64 or `0x` hex of the raw 32-byte secret
//!
//! Signatures are produced over the intent message digest and serialized as
//! `flag ‖ signature ‖ public_key`, base64-encoded for JSON-RPC.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bech32::{FromBase32, ToBase32, Variant};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use eyre::{eyre, Result};
use std::fmt;
use tracing::debug;

use crate::address::SuiAddress;
use crate::hash::{address_from_public_key, intent_message_digest};

/// Signature scheme flag for Ed25519
pub const ED25519_FLAG: u8 = 0x00;

/// Human-readable part of bech32-encoded private keys
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// Length of a serialized Ed25519 signature: flag + 64 + 32
pub const ED25519_SIGNATURE_LENGTH: usize = 1 + 64 + 32;

/// Ed25519 account keypair
#[derive(Clone)]
pub struct SuiKeypair {
    signing_key: SigningKey,
    address: SuiAddress,
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SuiKeypair {
    /// Create from a raw 32-byte secret
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let address =
            address_from_public_key(ED25519_FLAG, signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Parse any supported private key encoding
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();

        if encoded.starts_with(SUI_PRIVATE_KEY_PREFIX) {
            return Self::from_bech32(encoded);
        }

        if let Some(hex_part) = encoded.strip_prefix("0x") {
            let bytes =
                hex::decode(hex_part).map_err(|e| eyre!("Invalid hex private key: {}", e))?;
            return Self::from_key_bytes(&bytes);
        }

        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| eyre!("Private key is neither suiprivkey, hex nor base64: {}", e))?;
        Self::from_key_bytes(&bytes)
    }

    /// Parse a `suiprivkey1...` string
    pub fn from_bech32(encoded: &str) -> Result<Self> {
        let (hrp, data, variant) =
            bech32::decode(encoded).map_err(|e| eyre!("Invalid bech32 private key: {}", e))?;

        if hrp != SUI_PRIVATE_KEY_PREFIX {
            return Err(eyre!(
                "Expected '{}' prefix, got '{}'",
                SUI_PRIVATE_KEY_PREFIX,
                hrp
            ));
        }
        if variant != Variant::Bech32 {
            return Err(eyre!("Sui private keys use bech32, not bech32m"));
        }

        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| eyre!("Invalid bech32 payload: {}", e))?;
        if bytes.len() != 33 {
            return Err(eyre!(
                "bech32 private key payload must be 33 bytes, got {}",
                bytes.len()
            ));
        }
        Self::from_key_bytes(&bytes)
    }

    /// `flag ‖ secret` (33 bytes) or a bare secret (32 bytes)
    fn from_key_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = match bytes.len() {
            32 => bytes,
            33 => {
                if bytes[0] != ED25519_FLAG {
                    return Err(eyre!(
                        "Unsupported key scheme flag 0x{:02x}: only Ed25519 is supported",
                        bytes[0]
                    ));
                }
                &bytes[1..]
            }
            len => return Err(eyre!("Private key must be 32 or 33 bytes, got {}", len)),
        };

        let mut raw = [0u8; 32];
        raw.copy_from_slice(secret);
        Ok(Self::from_secret_bytes(raw))
    }

    /// Encode as `suiprivkey1...`
    pub fn to_bech32(&self) -> Result<String> {
        let mut payload = Vec::with_capacity(33);
        payload.push(ED25519_FLAG);
        payload.extend_from_slice(&self.signing_key.to_bytes());
        bech32::encode(SUI_PRIVATE_KEY_PREFIX, payload.to_base32(), Variant::Bech32)
            .map_err(|e| eyre!("Failed to encode private key: {}", e))
    }

    /// The account address of this key
    pub fn address(&self) -> SuiAddress {
        self.address
    }

    /// Raw public key bytes
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign BCS-encoded transaction data
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> SuiSignature {
        let digest = intent_message_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut bytes = Vec::with_capacity(ED25519_SIGNATURE_LENGTH);
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.extend_from_slice(self.signing_key.verifying_key().as_bytes());

        debug!(address = %self.address, "Signed transaction data");
        SuiSignature(bytes)
    }
}

/// Serialized user signature: `flag ‖ signature ‖ public_key`
#[derive(Clone, PartialEq, Eq)]
pub struct SuiSignature(Vec<u8>);

impl fmt::Debug for SuiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiSignature({})", self.to_base64())
    }
}

impl SuiSignature {
    /// Parse from base64
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| eyre!("Invalid base64 signature: {}", e))?;
        if bytes.len() != ED25519_SIGNATURE_LENGTH {
            return Err(eyre!(
                "Ed25519 signature must be {} bytes, got {}",
                ED25519_SIGNATURE_LENGTH,
                bytes.len()
            ));
        }
        if bytes[0] != ED25519_FLAG {
            return Err(eyre!("Unsupported signature scheme flag 0x{:02x}", bytes[0]));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Address of the signer embedded in the signature
    pub fn signer_address(&self) -> SuiAddress {
        address_from_public_key(ED25519_FLAG, &self.0[65..])
    }

    /// Verify against BCS-encoded transaction data
    pub fn verify(&self, tx_bytes: &[u8]) -> Result<()> {
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&self.0[1..65]);
        let mut pk = [0u8; 32];
        pk.copy_from_slice(&self.0[65..]);

        let verifying_key =
            VerifyingKey::from_bytes(&pk).map_err(|e| eyre!("Invalid public key: {}", e))?;
        let digest = intent_message_digest(tx_bytes);
        verifying_key
            .verify(&digest, &Signature::from_bytes(&sig))
            .map_err(|e| eyre!("Signature verification failed: {}", e))
    }
}
