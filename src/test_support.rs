//! In-crate fakes for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ledger::client::LedgerRpc;
use crate::ledger::types::{PendingTransaction, RpcError, RpcResult};
use crate::transaction::request::TransactionRequest;
use crate::wallet::provider::{AccountInfo, ProviderError, WalletProvider};

/// Wallet that answers from fixed data and counts calls.
pub struct FakeWallet {
    pub address: String,
    pub reject_connect: bool,
    pub reject_submit: bool,
    pub calls: AtomicUsize,
    pub submitted: Mutex<Vec<TransactionRequest>>,
}

impl FakeWallet {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            reject_connect: false,
            reject_submit: false,
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn info(&self) -> AccountInfo {
        AccountInfo {
            address: self.address.clone(),
            public_key: vec![7; 32],
        }
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn connect(&self) -> Result<AccountInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_connect {
            return Err(ProviderError::Rejected("user closed the prompt".to_string()));
        }
        Ok(self.info())
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info())
    }

    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<PendingTransaction, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_submit {
            return Err(ProviderError::Rejected("insufficient balance".to_string()));
        }
        self.submitted.lock().unwrap().push(request.clone());
        Ok(PendingTransaction {
            hash: format!("0xhash{}", n),
        })
    }
}

/// What [`FakeRpc`] answers with.
#[derive(Clone, Copy)]
pub enum FinalityBehavior {
    Commit,
    Timeout,
    Abort,
}

/// Finality client with a fixed answer.
pub struct FakeRpc {
    pub behavior: FinalityBehavior,
    pub calls: AtomicUsize,
}

impl FakeRpc {
    pub fn new(behavior: FinalityBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerRpc for FakeRpc {
    async fn wait_for_transaction(&self, hash: &str) -> RpcResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            FinalityBehavior::Commit => Ok(()),
            FinalityBehavior::Timeout => Err(RpcError::Timeout(20)),
            FinalityBehavior::Abort => Err(RpcError::TransactionFailed {
                hash: hash.to_string(),
                vm_status: "Move abort".to_string(),
            }),
        }
    }
}
