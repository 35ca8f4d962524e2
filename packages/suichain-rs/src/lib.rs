//! Suichain-RS: Sui Chain Library for Coin Locker
//!
//! This crate provides the chain-facing half of the coin locker:
//!
//! - **Addresses** - 32-byte Sui addresses and object ids with short-form parsing
//! - **Types** - Digests, object references, networks and well-known objects
//! - **Transactions** - Programmable transaction builder and BCS transaction data
//! - **Signing** - Ed25519 keypairs, intent signing, Sui signature encoding
//! - **RPC** - JSON-RPC client for fullnode queries and transaction execution
//! - **Wallet** - The sign-and-execute seam and a keypair-backed implementation
//! - **Testing Module** - Recording mock wallet and transaction assertions
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! suichain-rs = { path = "../suichain-rs" }
//! ```
//!
//! ## Feature Flags
//!
//! - `testing` - Enable testing utilities (mock wallet, assertions)

// Core modules (always available)
pub mod address;
pub mod client;
pub mod hash;
pub mod redact;
pub mod responses;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod wallet;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used items at the crate root
pub use address::{ObjectId, SuiAddress, SUI_ADDRESS_LENGTH};
pub use client::SuiRpcClient;
pub use hash::{blake2b256, intent_message_digest, transaction_digest};
pub use responses::{
    Coin, ExecutionStatus, Page, SuiObjectData, SuiObjectResponse, TransactionBlockResponse,
    TransactionBlockResponseOptions, TransactionEffects,
};
pub use signer::{SuiKeypair, SuiSignature};
pub use transaction::{
    Argument, CallArg, Command, MoveTarget, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, ProgrammableTransactionBuilder, TransactionData, TypeTag,
};
pub use types::{
    Digest, Network, ObjectDigest, ObjectRef, SequenceNumber, TransactionDigest,
    SUI_CLOCK_OBJECT_ID, SUI_CLOCK_OBJECT_SHARED_VERSION,
};
pub use wallet::{KeypairWallet, KeypairWalletConfig, Wallet};
