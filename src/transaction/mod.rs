//! Transaction subsystem.
//!
//! # Data Flow
//! ```text
//! workflow operation parameters
//!     → request.rs (TransactionRequest for one module entry function)
//!     → dispatcher.rs (wallet sign & submit → RPC await finality)
//!     → TransactionOutcome { hash, finalized: true } or WorkflowError
//! ```

pub mod dispatcher;
pub mod request;

pub use dispatcher::{TransactionDispatcher, TransactionOutcome};
pub use request::{EntryArgument, RewardModule, TransactionRequest};
