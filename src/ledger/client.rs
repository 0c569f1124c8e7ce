//! Fullnode REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the fullnode REST endpoint
//! - Query chain state (ledger info, sequence numbers, gas estimates)
//! - Encode and submit signed transactions
//! - Await transaction finality

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::time::{interval, timeout};

use crate::config::{FinalityConfig, NetworkConfig};
use crate::ledger::address::CanonicalAddress;
use crate::ledger::types::{
    AccountData, ApiErrorBody, GasEstimate, LedgerInfo, PendingTransaction, RpcError, RpcResult,
    SignedTransaction, TransactionInfo, TransactionStatus, UnsignedTransaction,
};

/// Finality capability consumed by the transaction dispatcher.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Wait until the transaction with `hash` is finalized.
    ///
    /// Finalized means committed and executed successfully. A transaction
    /// that commits with `success: false` is reported as
    /// [`RpcError::TransactionFailed`].
    async fn wait_for_transaction(&self, hash: &str) -> RpcResult<()>;
}

/// REST client for an Aptos fullnode.
#[derive(Clone)]
pub struct AptosRestClient {
    http: reqwest::Client,
    /// Base URL including the `/v1/` path.
    base_url: url::Url,
    network: NetworkConfig,
    finality: FinalityConfig,
}

impl AptosRestClient {
    /// Create a new client.
    ///
    /// No request is made here; use [`verify_chain_id`](Self::verify_chain_id)
    /// to check the endpoint.
    pub fn new(network: NetworkConfig, finality: FinalityConfig) -> RpcResult<Self> {
        let base_url = api_base(&network.node_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .build()
            .map_err(|e| RpcError::Http(e.to_string()))?;

        tracing::info!(node_url = %network.node_url, "Ledger client initialized");

        Ok(Self {
            http,
            base_url,
            network,
            finality,
        })
    }

    fn endpoint(&self, path: &str) -> RpcResult<url::Url> {
        self.base_url.join(path).map_err(|e| RpcError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RpcResult<T> {
        let response = self.http.get(self.endpoint(path)?).send().await?;
        decode(response).await
    }

    /// Get ledger info (chain ID, version, timestamp).
    pub async fn ledger_info(&self) -> RpcResult<LedgerInfo> {
        let mut url = self.base_url.clone();
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    /// Verify the connected chain ID matches configuration.
    ///
    /// Passes without a request when no chain ID is configured.
    pub async fn verify_chain_id(&self) -> RpcResult<()> {
        let Some(expected) = self.network.chain_id else {
            return Ok(());
        };
        let info = self.ledger_info().await?;
        if info.chain_id != expected {
            return Err(RpcError::ChainMismatch {
                expected,
                actual: info.chain_id,
            });
        }
        Ok(())
    }

    /// Get the next sequence number for an account.
    pub async fn account_sequence_number(&self, address: &CanonicalAddress) -> RpcResult<u64> {
        let account: AccountData = self
            .get_json(&format!("accounts/{}", address))
            .await?;
        Ok(account.sequence_number)
    }

    /// Get the node's gas unit price estimate.
    pub async fn estimate_gas_price(&self) -> RpcResult<u64> {
        let estimate: GasEstimate = self.get_json("estimate_gas_price").await?;
        Ok(estimate.gas_estimate)
    }

    /// Get the bytes a sender has to sign for `transaction`.
    pub async fn encode_submission(&self, transaction: &UnsignedTransaction) -> RpcResult<Vec<u8>> {
        let response = self
            .http
            .post(self.endpoint("transactions/encode_submission")?)
            .json(transaction)
            .send()
            .await?;
        let encoded: String = decode(response).await?;
        let hex_body = encoded.strip_prefix("0x").unwrap_or(&encoded);
        hex::decode(hex_body).map_err(|e| RpcError::Decode(format!("signing message: {}", e)))
    }

    /// Submit a signed transaction to the mempool.
    pub async fn submit_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> RpcResult<PendingTransaction> {
        let response = self
            .http
            .post(self.endpoint("transactions")?)
            .json(transaction)
            .send()
            .await?;
        decode(response).await
    }

    /// Look a transaction up by hash. `None` when the node does not know it yet.
    pub async fn transaction_by_hash(&self, hash: &str) -> RpcResult<Option<TransactionInfo>> {
        let response = self
            .http
            .get(self.endpoint(&format!("transactions/by_hash/{}", hash))?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[async_trait]
impl LedgerRpc for AptosRestClient {
    async fn wait_for_transaction(&self, hash: &str) -> RpcResult<()> {
        let timeout_secs = self.finality.timeout_secs;
        let poll_interval = Duration::from_millis(self.finality.poll_interval_ms);

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let info = match self.transaction_by_hash(hash).await {
                    Ok(Some(info)) => info,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %hash, "Transaction not yet visible");
                        continue;
                    }
                    // Transient node errors are retried until the deadline.
                    Err(e) if e.is_transient() => {
                        tracing::warn!(tx_hash = %hash, error = %e, "RPC error while polling");
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                match info.status() {
                    TransactionStatus::Pending => {
                        tracing::debug!(tx_hash = %hash, "Transaction pending");
                    }
                    TransactionStatus::Committed { version } => {
                        tracing::info!(tx_hash = %hash, version = ?version, "Transaction committed");
                        return Ok(());
                    }
                    TransactionStatus::Failed { vm_status } => {
                        return Err(RpcError::TransactionFailed {
                            hash: hash.to_string(),
                            vm_status,
                        });
                    }
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(RpcError::Timeout(timeout_secs)),
        }
    }
}

impl std::fmt::Debug for AptosRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AptosRestClient")
            .field("node_url", &self.network.node_url)
            .field("chain_id", &self.network.chain_id)
            .field("finality_timeout_secs", &self.finality.timeout_secs)
            .finish()
    }
}

/// Turn `node_url` into the `/v1/` base every endpoint is joined onto.
fn api_base(node_url: &str) -> RpcResult<url::Url> {
    let invalid = |reason: String| RpcError::InvalidUrl {
        url: node_url.to_string(),
        reason,
    };
    let mut url = url::Url::parse(node_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("cannot be a base URL".to_string()));
    }

    let path = url.path().trim_end_matches('/').to_string();
    let path = if path.ends_with("/v1") {
        format!("{}/", path)
    } else {
        format!("{}/v1/", path)
    };
    url.set_path(&path);
    Ok(url)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> RpcResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(|e| RpcError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| match e.error_code {
            Some(code) => format!("{} ({})", e.message, code),
            None => e.message,
        })
        .unwrap_or(body);
    Err(RpcError::Api {
        status: status.as_u16(),
        message,
    })
}
