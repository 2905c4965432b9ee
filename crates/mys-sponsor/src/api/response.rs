//! Response types returned by the ledger.

use crate::types::{ObjectDigest, ObjectId, ObjectRef};
use serde::{Deserialize, Deserializer, Serialize};

/// The status string the ledger reports for a successful execution.
pub const STATUS_SUCCESS: &str = "success";

/// Deserializes a u64 that the node may encode either as a JSON number or as
/// a decimal string (large integers are sent as strings).
pub(crate) fn deserialize_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrU64 {
        Number(u64),
        Text(String),
    }

    match StringOrU64::deserialize(deserializer)? {
        StringOrU64::Number(n) => Ok(n),
        StringOrU64::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// One page of a paginated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Cursor to pass to fetch the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether another page exists.
    #[serde(default)]
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Creates a single, final page.
    pub fn single(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
            has_next_page: false,
        }
    }

    /// Creates an empty final page.
    pub fn empty() -> Self {
        Self::single(Vec::new())
    }
}

/// Summary of a coin object owned by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinSummary {
    /// Fully qualified coin type, e.g. `0x2::mys::MYS`.
    pub coin_type: String,
    /// The coin's object id.
    pub coin_object_id: ObjectId,
    /// The coin's current version.
    #[serde(deserialize_with = "deserialize_u64")]
    pub version: u64,
    /// The digest of the current version.
    pub digest: ObjectDigest,
    /// Coin balance in the smallest unit.
    #[serde(deserialize_with = "deserialize_u64")]
    pub balance: u64,
    /// Digest of the transaction that last touched the coin.
    #[serde(default)]
    pub previous_transaction: Option<String>,
}

impl CoinSummary {
    /// Returns the reference to the coin's current version.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.coin_object_id, self.version, self.digest.clone())
    }
}

/// The execution status inside transaction effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    /// `"success"` or `"failure"`.
    pub status: String,
    /// Failure detail, when the status is not success.
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    /// A success status.
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            error: None,
        }
    }

    /// A failure status with the given detail.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: "failure".to_string(),
            error: Some(error.into()),
        }
    }
}

/// The effects of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    /// The execution status.
    pub status: ExecutionStatus,
    /// Digest of the transaction these effects belong to.
    #[serde(default)]
    pub transaction_digest: Option<String>,
    /// The gas object used, as reported by the node.
    #[serde(default)]
    pub gas_object: Option<serde_json::Value>,
}

/// The ledger's answer to a transaction submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    /// The transaction digest.
    pub digest: String,
    /// Effects, when requested.
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    /// Object changes, when requested.
    #[serde(default)]
    pub object_changes: Option<Vec<serde_json::Value>>,
    /// Non-fatal errors reported by the node.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl TransactionBlockResponse {
    /// Returns the reported `effects.status.status`, if effects are present.
    pub fn status(&self) -> Option<&str> {
        self.effects.as_ref().map(|e| e.status.status.as_str())
    }
}
