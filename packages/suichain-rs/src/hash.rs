//! Hash computation for Sui signing and identities
//!
//! Sui hashes everything with Blake2b-256:
//!
//! - Transaction digest: `blake2b256("TransactionData::" ‖ bcs(tx_data))`
//! - Signing digest: `blake2b256(intent ‖ bcs(tx_data))`
//! - Address: `blake2b256(scheme_flag ‖ public_key)`

use blake2::{digest::consts::U32, Blake2b, Digest as _};

use crate::address::SuiAddress;
use crate::types::Digest;

type Blake2b256 = Blake2b<U32>;

/// Prefix hashed in front of transaction data for its digest
pub const TRANSACTION_DATA_PREFIX: &[u8] = b"TransactionData::";

/// Intent for a user transaction: scope TransactionData, version V0, app Sui
pub const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Compute Blake2b-256 of data
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Digest of BCS-encoded transaction data
pub fn transaction_digest(tx_bytes: &[u8]) -> Digest {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_DATA_PREFIX);
    hasher.update(tx_bytes);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    Digest::new(output)
}

/// Digest that the account key signs for a transaction
pub fn intent_message_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Derive the account address from a signature scheme flag and public key
pub fn address_from_public_key(flag: u8, public_key: &[u8]) -> SuiAddress {
    let mut data = Vec::with_capacity(1 + public_key.len());
    data.push(flag);
    data.extend_from_slice(public_key);
    SuiAddress::new(blake2b256(&data))
}
