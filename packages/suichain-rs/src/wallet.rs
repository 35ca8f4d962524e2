//! Wallet: the sign-and-execute seam
//!
//! [`Wallet`] is what the front-end talks to: it knows the connected address
//! and turns an unsigned programmable transaction into an executed one. The
//! wallet owns gas selection and signing, so callers only describe *what*
//! the transaction does.
//!
//! [`KeypairWallet`] is the local implementation: it holds an Ed25519 key,
//! resolves gas from the fullnode, signs, and executes with effects and
//! events requested.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use eyre::{eyre, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::address::SuiAddress;
use crate::client::SuiRpcClient;
use crate::hash::transaction_digest;
use crate::redact::Redacted;
use crate::responses::{TransactionBlockResponse, TransactionBlockResponseOptions};
use crate::signer::{SuiKeypair, SuiSignature};
use crate::transaction::{ProgrammableTransaction, TransactionData};

/// Default gas budget in MIST (0.01 SUI)
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// Maximum number of coins a transaction may use for gas payment
pub const MAX_GAS_OBJECTS: usize = 256;

/// A connected wallet account that can sign and execute transactions
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Address of the connected account
    fn address(&self) -> SuiAddress;

    /// Sign the transaction and execute it on the network.
    ///
    /// Any rejection (signing declined, transport failure, node error,
    /// on-chain abort) is returned as an error carrying the reason.
    async fn sign_and_execute(
        &self,
        transaction: ProgrammableTransaction,
    ) -> Result<TransactionBlockResponse>;
}

#[async_trait]
impl<W: Wallet + ?Sized> Wallet for Arc<W> {
    fn address(&self) -> SuiAddress {
        (**self).address()
    }

    async fn sign_and_execute(
        &self,
        transaction: ProgrammableTransaction,
    ) -> Result<TransactionBlockResponse> {
        (**self).sign_and_execute(transaction).await
    }
}

/// Configuration for the keypair wallet
#[derive(Debug, Clone)]
pub struct KeypairWalletConfig {
    /// Fullnode JSON-RPC URL
    pub rpc_url: String,
    /// Encoded private key (`suiprivkey1...`, keystore base64, or hex)
    pub private_key: Redacted<String>,
    /// Gas budget in MIST (defaults to DEFAULT_GAS_BUDGET)
    pub gas_budget: Option<u64>,
}

/// Wallet backed by a local Ed25519 key and a fullnode
pub struct KeypairWallet {
    /// Account key
    keypair: SuiKeypair,
    /// Fullnode client used for gas resolution and execution
    client: Arc<SuiRpcClient>,
    /// Gas budget for every transaction
    gas_budget: u64,
}

impl KeypairWallet {
    /// Create a new wallet from configuration
    pub fn new(config: KeypairWalletConfig) -> Result<Self> {
        let keypair = SuiKeypair::from_encoded(config.private_key.expose())?;
        let client = Arc::new(SuiRpcClient::new(&config.rpc_url)?);
        Ok(Self::with_client(
            keypair,
            client,
            config.gas_budget.unwrap_or(DEFAULT_GAS_BUDGET),
        ))
    }

    /// Create from an existing key and client
    pub fn with_client(keypair: SuiKeypair, client: Arc<SuiRpcClient>, gas_budget: u64) -> Self {
        info!(
            address = %keypair.address(),
            rpc_url = %client.rpc_url(),
            gas_budget = gas_budget,
            "Keypair wallet initialized"
        );

        Self {
            keypair,
            client,
            gas_budget,
        }
    }

    /// Get the gas budget
    pub fn gas_budget(&self) -> u64 {
        self.gas_budget
    }

    /// Resolve gas payment and price for a programmable transaction.
    ///
    /// Every SUI coin of the sender (up to the protocol maximum) is used as
    /// gas payment; the node merges them into the gas coin, so a split from
    /// gas can draw on the whole balance.
    pub async fn prepare(&self, transaction: ProgrammableTransaction) -> Result<TransactionData> {
        let sender = self.keypair.address();

        let coins = self.client.get_gas_coins(sender, MAX_GAS_OBJECTS).await?;
        if coins.is_empty() {
            return Err(eyre!("No SUI coins available to pay gas for {}", sender));
        }

        let total: u128 = coins.iter().map(|c| c.balance as u128).sum();
        if total < self.gas_budget as u128 {
            return Err(eyre!(
                "Insufficient SUI for gas budget: balance {} MIST, budget {} MIST",
                total,
                self.gas_budget
            ));
        }

        let gas_price = self.client.get_reference_gas_price().await?;

        debug!(
            sender = %sender,
            gas_coins = coins.len(),
            gas_balance = %total,
            gas_price = gas_price,
            "Resolved gas payment"
        );

        Ok(TransactionData::new_programmable(
            sender,
            coins.iter().map(|c| c.object_ref()).collect(),
            transaction,
            self.gas_budget,
            gas_price,
        ))
    }

    /// Sign transaction data, returning the bytes and signature to submit
    pub fn sign(&self, data: &TransactionData) -> Result<(Vec<u8>, SuiSignature)> {
        let tx_bytes = data.to_bcs_bytes()?;
        let signature = self.keypair.sign_transaction(&tx_bytes);
        Ok((tx_bytes, signature))
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn address(&self) -> SuiAddress {
        self.keypair.address()
    }

    async fn sign_and_execute(
        &self,
        transaction: ProgrammableTransaction,
    ) -> Result<TransactionBlockResponse> {
        let data = self.prepare(transaction).await?;
        let (tx_bytes, signature) = self.sign(&data)?;
        let digest = transaction_digest(&tx_bytes);

        info!(
            digest = %digest,
            sender = %self.address(),
            "Executing transaction block"
        );

        let response = self
            .client
            .execute_transaction_block(
                &BASE64.encode(&tx_bytes),
                &[signature.to_base64()],
                &TransactionBlockResponseOptions::with_effects_and_events(),
            )
            .await?;

        if let Err(e) = response.ensure_success() {
            warn!(digest = %response.digest, error = %e, "Transaction execution failed");
            return Err(e);
        }

        info!(digest = %response.digest, "Transaction executed");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = KeypairWalletConfig {
            rpc_url: "http://localhost:9000".to_string(),
            private_key: Redacted::new("suiprivkey1secret".to_string()),
            gas_budget: None,
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("suiprivkey1secret"));
    }

    #[test]
    fn test_wallet_from_config() {
        let key = SuiKeypair::from_secret_bytes([3u8; 32]);
        let wallet = KeypairWallet::new(KeypairWalletConfig {
            rpc_url: "http://localhost:9000".to_string(),
            private_key: key.to_bech32().unwrap().into(),
            gas_budget: None,
        })
        .unwrap();

        assert_eq!(wallet.address(), key.address());
        assert_eq!(wallet.gas_budget(), DEFAULT_GAS_BUDGET);
    }

    #[test]
    fn test_wallet_rejects_bad_key() {
        let result = KeypairWallet::new(KeypairWalletConfig {
            rpc_url: "http://localhost:9000".to_string(),
            private_key: Redacted::new("nope".to_string()),
            gas_budget: Some(1),
        });
        assert!(result.is_err());
    }
}
