//! Sui JSON-RPC response types
//!
//! Only the fields the coin locker reads are modeled; everything else in the
//! fullnode responses is ignored during deserialization. Numbers the node
//! encodes as strings (versions, balances, gas prices) are accepted in either
//! form.

use eyre::{eyre, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::address::{ObjectId, SuiAddress};
use crate::types::{ObjectDigest, ObjectRef, SequenceNumber, TransactionDigest};

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a paginated query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T, C> {
    pub data: Vec<T>,
    #[serde(default = "Option::default")]
    pub next_cursor: Option<C>,
    #[serde(default)]
    pub has_next_page: bool,
}

// ============================================================================
// Objects
// ============================================================================

/// Entry of `suix_getOwnedObjects`
#[derive(Debug, Clone, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Object metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: ObjectId,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
}

impl SuiObjectData {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_id, self.version, self.digest)
    }
}

/// Entry of `suix_getCoins`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub balance: u64,
}

impl Coin {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.coin_object_id, self.version, self.digest)
    }
}

// ============================================================================
// Transaction execution
// ============================================================================

/// Which parts of the executed transaction the node should return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponseOptions {
    pub show_input: bool,
    pub show_raw_input: bool,
    pub show_effects: bool,
    pub show_events: bool,
    pub show_object_changes: bool,
    pub show_balance_changes: bool,
}

impl TransactionBlockResponseOptions {
    /// Effects and events, the options the locker submits with
    pub fn with_effects_and_events() -> Self {
        Self {
            show_effects: true,
            show_events: true,
            ..Self::default()
        }
    }
}

/// Result of `sui_executeTransactionBlock`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: TransactionDigest,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    #[serde(default)]
    pub events: Option<Vec<SuiEvent>>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl TransactionBlockResponse {
    /// A successful response, as returned for an executed transaction
    pub fn success(digest: TransactionDigest) -> Self {
        Self {
            digest,
            effects: Some(TransactionEffects {
                status: ExecutionStatus::Success,
                gas_used: None,
            }),
            events: Some(Vec::new()),
            errors: Vec::new(),
        }
    }

    /// Execution status from the effects, if the node returned them
    pub fn status(&self) -> Option<&ExecutionStatus> {
        self.effects.as_ref().map(|e| &e.status)
    }

    /// Fail with the chain's reason when execution did not succeed
    pub fn ensure_success(&self) -> Result<()> {
        if let Some(ExecutionStatus::Failure { error }) = self.status() {
            return Err(eyre!("{}", error));
        }
        if !self.errors.is_empty() {
            return Err(eyre!("{}", self.errors.join("; ")));
        }
        Ok(())
    }
}

/// Transaction effects (subset)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub gas_used: Option<GasCostSummary>,
}

/// Execution outcome reported in effects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

/// Gas charged for a transaction, in MIST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub computation_cost: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub storage_cost: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub storage_rebate: u64,
}

/// Move event emitted by a transaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    #[serde(default)]
    pub package_id: Option<ObjectId>,
    #[serde(default)]
    pub transaction_module: Option<String>,
    #[serde(default)]
    pub sender: Option<SuiAddress>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parsed_json: Option<serde_json::Value>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Accept `"123"` or `123`
pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Digest;
    use serde_json::json;

    fn digest_str() -> String {
        Digest::new([1u8; 32]).to_base58()
    }

    #[test]
    fn test_owned_objects_page() {
        let page: Page<SuiObjectResponse, ObjectId> = serde_json::from_value(json!({
            "data": [
                {"data": {"objectId": "0x5", "version": "12", "digest": digest_str(), "type": "0x2::coin::Coin<0x2::sui::SUI>"}},
                {"error": {"code": "deleted"}}
            ],
            "nextCursor": "0x5",
            "hasNextPage": false
        }))
        .unwrap();

        assert_eq!(page.data.len(), 2);
        let first = page.data[0].data.as_ref().unwrap();
        assert_eq!(first.object_id, SuiAddress::from_low_byte(5));
        assert_eq!(first.version, 12);
        assert!(page.data[1].data.is_none());
        assert_eq!(page.next_cursor, Some(SuiAddress::from_low_byte(5)));
    }

    #[test]
    fn test_coin_numbers_as_strings() {
        let coin: Coin = serde_json::from_value(json!({
            "coinType": "0x2::sui::SUI",
            "coinObjectId": "0x7",
            "version": "3",
            "digest": digest_str(),
            "balance": "1000000000",
            "previousTransaction": digest_str()
        }))
        .unwrap();
        assert_eq!(coin.balance, 1_000_000_000);
        assert_eq!(coin.object_ref().version, 3);
    }

    #[test]
    fn test_execution_failure_is_an_error() {
        let response: TransactionBlockResponse = serde_json::from_value(json!({
            "digest": digest_str(),
            "effects": {
                "messageVersion": "v1",
                "status": {"status": "failure", "error": "MoveAbort(token_lock, 1) in command 1"}
            },
            "events": []
        }))
        .unwrap();

        let err = response.ensure_success().unwrap_err();
        assert_eq!(err.to_string(), "MoveAbort(token_lock, 1) in command 1");
    }

    #[test]
    fn test_execution_success() {
        let response: TransactionBlockResponse = serde_json::from_value(json!({
            "digest": digest_str(),
            "effects": {
                "status": {"status": "success"},
                "gasUsed": {"computationCost": "1000", "storageCost": "2000", "storageRebate": "500"}
            }
        }))
        .unwrap();
        assert!(response.ensure_success().is_ok());
        assert_eq!(response.status(), Some(&ExecutionStatus::Success));
    }

    #[test]
    fn test_response_options_serialize_camel_case() {
        let opts = TransactionBlockResponseOptions::with_effects_and_events();
        let value = serde_json::to_value(opts).unwrap();
        assert_eq!(value["showEffects"], true);
        assert_eq!(value["showEvents"], true);
        assert_eq!(value["showInput"], false);
    }

    #[test]
    fn test_json_rpc_error_envelope() {
        let envelope: JsonRpcResponse<u64> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        }))
        .unwrap();
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error.unwrap().to_string(), "Invalid params");
    }
}
