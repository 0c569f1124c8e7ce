//! Wallet provider capability set.

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::types::PendingTransaction;
use crate::transaction::request::TransactionRequest;

/// Account details reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Address as the provider formats it; canonicalized by the session.
    pub address: String,
    pub public_key: Vec<u8>,
}

/// Errors surfaced by a wallet provider. Kept opaque on purpose: callers only
/// report them.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The user declined the request.
    #[error("Request rejected by user: {0}")]
    Rejected(String),

    /// Invalid key material or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Estimated gas price exceeded the configured ceiling.
    #[error("Gas price {current} exceeds maximum {max}")]
    GasPriceTooHigh { current: u64, max: u64 },

    /// The provider's own ledger calls failed.
    #[error(transparent)]
    Rpc(#[from] crate::ledger::types::RpcError),
}

/// Signing agent that holds the user's key.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the provider to link the account to this controller.
    async fn connect(&self) -> Result<AccountInfo, ProviderError>;

    /// Query the currently linked account.
    async fn account(&self) -> Result<AccountInfo, ProviderError>;

    /// Sign `request` and submit it to the ledger, returning its hash.
    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<PendingTransaction, ProviderError>;
}
