//! Transaction submission and finality.
//!
//! # Responsibilities
//! - Hand a request to the session's wallet provider for signing and submission
//! - Await finality through the ledger RPC client
//! - Report either a finalized outcome or a single error, never anything in between

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ledger::client::LedgerRpc;
use crate::transaction::request::TransactionRequest;
use crate::wallet::session::WalletSession;
use crate::workflow::error::WorkflowError;

/// Result of a transaction that reached finality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: String,
    pub finalized: bool,
}

/// Submits requests and waits for them to commit.
#[derive(Clone)]
pub struct TransactionDispatcher {
    rpc: Arc<dyn LedgerRpc>,
}

impl TransactionDispatcher {
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self { rpc }
    }

    /// Sign and submit `request` through the session's provider, then wait
    /// for finality.
    pub async fn submit(
        &self,
        session: &WalletSession,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, WorkflowError> {
        let provider = session.provider().ok_or(WorkflowError::NotConnected)?;

        let pending = provider
            .sign_and_submit_transaction(&request)
            .await
            .map_err(|e| WorkflowError::SubmissionRejected(e.to_string()))?;

        tracing::debug!(
            function = %request,
            tx_hash = %pending.hash,
            "Awaiting finality"
        );

        self.rpc.wait_for_transaction(&pending.hash).await?;

        Ok(TransactionOutcome {
            hash: pending.hash,
            finalized: true,
        })
    }
}

impl std::fmt::Debug for TransactionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionDispatcher").finish_non_exhaustive()
    }
}
