//! Workflow error kinds.

use thiserror::Error;

use crate::ledger::types::RpcError;

/// Everything a workflow operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// No wallet provider is present in the host environment.
    #[error("Wallet provider not found! Please install or configure one.")]
    WalletUnavailable,

    /// The provider's connect or account call failed.
    #[error("Connection rejected: {0}")]
    ConnectionRejected(String),

    /// Operation attempted before a wallet was connected.
    #[error("Please connect your wallet first")]
    NotConnected,

    /// A workflow-level precondition is unmet.
    #[error("{0}")]
    PreconditionFailed(String),

    /// The wallet failed to sign or submit the transaction.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction did not reach finality in time.
    #[error("Finality timeout: {0}")]
    FinalityTimeout(String),

    /// Awaiting finality failed.
    #[error("Finality error: {0}")]
    FinalityError(String),
}

impl WorkflowError {
    /// True for errors raised before any provider or RPC call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            WorkflowError::WalletUnavailable
                | WorkflowError::NotConnected
                | WorkflowError::PreconditionFailed(_)
        )
    }

    /// Short stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::WalletUnavailable => "wallet_unavailable",
            WorkflowError::ConnectionRejected(_) => "connection_rejected",
            WorkflowError::NotConnected => "not_connected",
            WorkflowError::PreconditionFailed(_) => "precondition_failed",
            WorkflowError::SubmissionRejected(_) => "submission_rejected",
            WorkflowError::FinalityTimeout(_) => "finality_timeout",
            WorkflowError::FinalityError(_) => "finality_error",
        }
    }
}

impl From<RpcError> for WorkflowError {
    /// Failures of the finality wait.
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Timeout(_) => WorkflowError::FinalityTimeout(e.to_string()),
            other => WorkflowError::FinalityError(other.to_string()),
        }
    }
}
