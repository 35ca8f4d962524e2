//! Sui JSON-RPC Client
//!
//! Thin typed wrapper over the fullnode JSON-RPC API, covering the reads and
//! the execute call the coin locker needs:
//!
//! - `suix_getOwnedObjects` - objects owned by an address (one page)
//! - `suix_getCoins` - coin objects of a type, used for gas payment
//! - `suix_getReferenceGasPrice` - current reference gas price
//! - `sui_executeTransactionBlock` - submit signed transaction bytes

use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::address::{ObjectId, SuiAddress};
use crate::responses::{
    u64_from_string_or_number, Coin, JsonRpcResponse, Page, SuiObjectResponse,
    TransactionBlockResponse, TransactionBlockResponseOptions,
};
use crate::types::{Network, GAS_COIN_TYPE};

/// HTTP timeout for every RPC call
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Sui fullnode JSON-RPC client
pub struct SuiRpcClient {
    /// Fullnode URL
    rpc_url: String,
    /// HTTP client
    client: Client,
    /// JSON-RPC request id counter
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for a fullnode URL
    pub fn new(rpc_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_RPC_TIMEOUT)
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self {
            rpc_url: rpc_url.trim_end_matches('/').to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a client for a network's public fullnode
    pub fn for_network(network: Network) -> Result<Self> {
        Self::new(network.fullnode_url())
    }

    /// Get the RPC URL
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Generic JSON-RPC call
    ///
    /// Node-side errors are returned with the node's message unchanged so
    /// callers can surface it verbatim.
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method = method, id = id, url = %self.rpc_url, "Sending Sui RPC request");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send {} request", method))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!(
                "{} failed (HTTP {}): {}",
                method,
                status,
                response.text().await.unwrap_or_default()
            ));
        }

        let envelope: JsonRpcResponse<R> = response
            .json()
            .await
            .wrap_err_with(|| format!("Failed to parse {} response", method))?;

        match (envelope.result, envelope.error) {
            (_, Some(error)) => {
                debug!(method = method, code = error.code, "Sui RPC returned an error");
                Err(eyre!("{}", error))
            }
            (Some(result), None) => Ok(result),
            (None, None) => Err(eyre!("{} returned neither result nor error", method)),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// One page of objects owned by `owner`, with their types
    pub async fn get_owned_objects(
        &self,
        owner: SuiAddress,
        cursor: Option<ObjectId>,
        limit: Option<usize>,
    ) -> Result<Page<SuiObjectResponse, ObjectId>> {
        self.call(
            "suix_getOwnedObjects",
            json!([owner, { "options": { "showType": true } }, cursor, limit]),
        )
        .await
    }

    /// One page of coins of `coin_type` (SUI when `None`)
    pub async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: Option<&str>,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<Page<Coin, String>> {
        self.call(
            "suix_getCoins",
            json!([owner, coin_type.unwrap_or(GAS_COIN_TYPE), cursor, limit]),
        )
        .await
    }

    /// Up to `max` SUI coins of `owner`, following pages as needed
    pub async fn get_gas_coins(&self, owner: SuiAddress, max: usize) -> Result<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut cursor = None;

        loop {
            let page = self.get_coins(owner, None, cursor.clone(), None).await?;
            let empty = page.data.is_empty();
            coins.extend(page.data);

            if coins.len() >= max || !page.has_next_page || empty {
                break;
            }
            match page.next_cursor {
                // A cursor that does not advance would page forever
                Some(next) if cursor.as_ref() != Some(&next) => cursor = Some(next),
                _ => break,
            }
        }

        coins.truncate(max);
        Ok(coins)
    }

    /// Reference gas price for the current epoch, in MIST
    pub async fn get_reference_gas_price(&self) -> Result<u64> {
        let value: Value = self.call("suix_getReferenceGasPrice", json!([])).await?;
        u64_from_string_or_number(value)
            .map_err(|e| eyre!("Invalid reference gas price: {}", e))
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Submit signed transaction bytes
    pub async fn execute_transaction_block(
        &self,
        tx_bytes_base64: &str,
        signatures: &[String],
        options: &TransactionBlockResponseOptions,
    ) -> Result<TransactionBlockResponse> {
        self.call(
            "sui_executeTransactionBlock",
            json!([tx_bytes_base64, signatures, options]),
        )
        .await
    }
}
