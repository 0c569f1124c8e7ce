//! Course Rewards Controller Library
//!
//! Links a wallet session to the course reward ledger module: create course,
//! enroll, request reward, approve reward.

pub mod config;
pub mod ledger;
pub mod observability;
pub mod transaction;
pub mod wallet;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use config::schema::ControllerConfig;
pub use ledger::{canonicalize, AptosRestClient, CanonicalAddress, LedgerRpc};
pub use transaction::{TransactionDispatcher, TransactionOutcome, TransactionRequest};
pub use wallet::{LocalWallet, WalletProvider, WalletSession};
pub use workflow::{CourseWorkflowController, CourseWorkflowState, StatusReport, WorkflowError};
