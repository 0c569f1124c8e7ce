//! Fullnode wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the fullnode.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport-level failure (connection refused, TLS, request timeout).
    #[error("RPC error: {0}")]
    Http(String),

    /// The node answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured endpoint is not a usable URL.
    #[error("Invalid node URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u8, actual: u8 },

    /// The transaction committed but its execution aborted.
    #[error("Transaction {hash} failed: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    /// Transaction did not commit within the finality window.
    #[error("Transaction not committed after {0} seconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RpcError::Decode(e.to_string())
        } else {
            RpcError::Http(e.to_string())
        }
    }
}

impl RpcError {
    /// Whether a poll that hit this error should be retried.
    ///
    /// Transport failures, 5xx and 429 responses are transient. Other
    /// API errors are answers from the node and end the wait.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Http(_) => true,
            RpcError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type for fullnode operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Error body returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// Node and ledger summary from `GET /v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde(with = "string_u64")]
    pub ledger_version: u64,
    /// Microseconds since the Unix epoch.
    #[serde(with = "string_u64")]
    pub ledger_timestamp: u64,
}

/// Account resource summary from `GET /v1/accounts/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(with = "string_u64")]
    pub sequence_number: u64,
    pub authentication_key: String,
}

/// Gas price estimate from `GET /v1/estimate_gas_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasEstimate {
    pub gas_estimate: u64,
    #[serde(default)]
    pub prioritized_gas_estimate: Option<u64>,
}

/// Entry function call in the REST JSON encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    /// `address::module::function`.
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

/// Transaction body without a signature, as accepted by `encode_submission`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub sender: String,
    #[serde(with = "string_u64")]
    pub sequence_number: u64,
    #[serde(with = "string_u64")]
    pub max_gas_amount: u64,
    #[serde(with = "string_u64")]
    pub gas_unit_price: u64,
    #[serde(with = "string_u64")]
    pub expiration_timestamp_secs: u64,
    pub payload: EntryFunctionPayload,
}

/// Ed25519 authenticator attached to a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub kind: String,
    pub public_key: String,
    pub signature: String,
}

impl TransactionSignature {
    /// Build a single-signer Ed25519 authenticator from raw bytes.
    pub fn ed25519(public_key: &[u8], signature: &[u8]) -> Self {
        Self {
            kind: "ed25519_signature".to_string(),
            public_key: format!("0x{}", hex::encode(public_key)),
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

/// Signed transaction body for `POST /v1/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub transaction: UnsignedTransaction,
    pub signature: TransactionSignature,
}

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// Transaction as returned by `GET /v1/transactions/by_hash/{hash}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

/// Where a transaction stands from the node's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet known to the node, or still in the mempool.
    Pending,
    /// Committed and executed successfully.
    Committed { version: Option<u64> },
    /// Committed but execution aborted.
    Failed { vm_status: String },
}

impl TransactionInfo {
    /// Collapse the node's response into a [`TransactionStatus`].
    pub fn status(&self) -> TransactionStatus {
        if self.kind == "pending_transaction" {
            return TransactionStatus::Pending;
        }
        match self.success {
            Some(true) => TransactionStatus::Committed {
                version: self.version.as_deref().and_then(|v| v.parse().ok()),
            },
            Some(false) => TransactionStatus::Failed {
                vm_status: self
                    .vm_status
                    .clone()
                    .unwrap_or_else(|| "unknown VM status".to_string()),
            },
            None => TransactionStatus::Pending,
        }
    }
}

/// The REST API encodes 64-bit integers as decimal strings.
pub(crate) mod string_u64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
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
}
