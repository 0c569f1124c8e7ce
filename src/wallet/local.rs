//! Local Ed25519 key wallet.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit input
//! - Keys are never logged or serialized
//! - Sequence numbers are re-synced from chain before every submission

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use sha3::{Digest, Sha3_256};

use crate::config::GasConfig;
use crate::ledger::address::CanonicalAddress;
use crate::ledger::client::AptosRestClient;
use crate::ledger::types::{
    PendingTransaction, SignedTransaction, TransactionSignature, UnsignedTransaction,
};
use crate::transaction::request::TransactionRequest;
use crate::wallet::provider::{AccountInfo, ProviderError, WalletProvider};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "COURSE_REWARDS_PRIVATE_KEY";

/// Authentication key scheme byte for single Ed25519 keys.
const ED25519_SCHEME: u8 = 0x00;

/// Wallet provider backed by a private key held in process.
pub struct LocalWallet {
    signing_key: SigningKey,
    address: CanonicalAddress,
    client: AptosRestClient,
    gas: GasConfig,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without `0x`, and with the `ed25519-priv-`
    /// prefix some wallets export.
    pub fn from_private_key(
        private_key_hex: &str,
        client: AptosRestClient,
        gas: GasConfig,
    ) -> Result<Self, ProviderError> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed.strip_prefix("ed25519-priv-").unwrap_or(trimmed);
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let bytes = hex::decode(key_hex)
            .map_err(|e| ProviderError::Wallet(format!("Invalid private key format: {}", e)))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            ProviderError::Wallet(format!(
                "Invalid private key format: expected 32 bytes, got {}",
                b.len()
            ))
        })?;

        let signing_key = SigningKey::from_bytes(&bytes);
        let address = derive_address(&signing_key.verifying_key().to_bytes());

        tracing::info!(address = %address, "Local wallet initialized");

        Ok(Self {
            signing_key,
            address,
            client,
            gas,
        })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `COURSE_REWARDS_PRIVATE_KEY` from environment.
    pub fn from_env(client: AptosRestClient, gas: GasConfig) -> Result<Self, ProviderError> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ProviderError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, client, gas)
    }

    /// Get the wallet's account address.
    pub fn address(&self) -> &CanonicalAddress {
        &self.address
    }

    /// Get the wallet's public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    fn account_info(&self) -> AccountInfo {
        AccountInfo {
            address: self.address.to_string(),
            public_key: self.public_key().to_vec(),
        }
    }

    /// Build an unsigned transaction for `request` with current chain state.
    pub async fn build_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<UnsignedTransaction, ProviderError> {
        let sequence_number = self.client.account_sequence_number(&self.address).await?;

        let gas_unit_price = self.client.estimate_gas_price().await?;
        if gas_unit_price > self.gas.max_gas_unit_price {
            return Err(ProviderError::GasPriceTooHigh {
                current: gas_unit_price,
                max: self.gas.max_gas_unit_price,
            });
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Ok(UnsignedTransaction {
            sender: self.address.to_string(),
            sequence_number,
            max_gas_amount: self.gas.max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs: now.saturating_add(self.gas.expiration_secs),
            payload: request.to_payload(),
        })
    }

    /// Sign raw message bytes.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn connect(&self) -> Result<AccountInfo, ProviderError> {
        self.client.verify_chain_id().await?;
        Ok(self.account_info())
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        Ok(self.account_info())
    }

    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<PendingTransaction, ProviderError> {
        let transaction = self.build_transaction(request).await?;
        let signing_message = self.client.encode_submission(&transaction).await?;
        let signature = self.sign(&signing_message);

        let sequence_number = transaction.sequence_number;
        let signed = SignedTransaction {
            transaction,
            signature: TransactionSignature::ed25519(&self.public_key(), &signature),
        };
        let pending = self.client.submit_transaction(&signed).await?;

        tracing::info!(
            function = %request.function_id(),
            sequence_number,
            tx_hash = %pending.hash,
            "Transaction submitted"
        );
        Ok(pending)
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .field("client", &self.client)
            .finish()
    }
}

/// Account address for a single Ed25519 public key:
/// `sha3_256(public_key || scheme)`.
pub fn derive_address(public_key: &[u8; 32]) -> CanonicalAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    CanonicalAddress::new(&hex::encode(hasher.finalize()))
}
