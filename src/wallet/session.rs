//! Wallet-linked identity.
//!
//! A [`WalletSession`] is either disconnected or holds the identity obtained
//! from a successful connect together with the provider it came from. It is
//! never mutated; reconnecting builds a new one.

use std::fmt;
use std::sync::Arc;

use crate::ledger::address::{canonicalize, CanonicalAddress};
use crate::wallet::provider::WalletProvider;
use crate::workflow::error::WorkflowError;

struct SessionIdentity {
    address: CanonicalAddress,
    public_key: Vec<u8>,
    provider: Arc<dyn WalletProvider>,
}

/// The connected identity, if any.
#[derive(Clone, Default)]
pub struct WalletSession {
    identity: Option<Arc<SessionIdentity>>,
}

impl WalletSession {
    /// A session with no identity.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connect through `provider`.
    ///
    /// Fails with `WalletUnavailable` when there is no provider and with
    /// `ConnectionRejected` when the provider's connect or account call fails.
    pub async fn connect(
        provider: Option<Arc<dyn WalletProvider>>,
    ) -> Result<Self, WorkflowError> {
        let provider = provider.ok_or(WorkflowError::WalletUnavailable)?;

        provider
            .connect()
            .await
            .map_err(|e| WorkflowError::ConnectionRejected(e.to_string()))?;
        let account = provider
            .account()
            .await
            .map_err(|e| WorkflowError::ConnectionRejected(e.to_string()))?;

        let address = canonicalize(&account.address);
        tracing::info!(address = %address, "Wallet connected");

        Ok(Self {
            identity: Some(Arc::new(SessionIdentity {
                address,
                public_key: account.public_key,
                provider,
            })),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.identity.is_some()
    }

    pub fn address(&self) -> Option<&CanonicalAddress> {
        self.identity.as_ref().map(|id| &id.address)
    }

    pub fn public_key(&self) -> Option<&[u8]> {
        self.identity.as_ref().map(|id| id.public_key.as_slice())
    }

    /// Provider the session was connected through.
    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.identity.as_ref().map(|id| &id.provider)
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("connected", &self.is_connected())
            .field("address", &self.address())
            .finish()
    }
}
