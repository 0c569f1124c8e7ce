//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! user / provider supplied address strings
//!     → address.rs (canonical 0x form)
//! submitted transaction hash
//!     → client.rs (REST polling with timeouts)
//!     → finality reported to the dispatcher
//! ```
//!
//! # Constraints
//! - Address content is not validated unless strict mode asks for it
//! - All REST calls have configurable timeouts
//! - Finality waits are bounded by `finality.timeout_secs`

pub mod address;
pub mod client;
pub mod types;

pub use address::{canonicalize, CanonicalAddress};
pub use client::{AptosRestClient, LedgerRpc};
pub use types::{PendingTransaction, RpcError, RpcResult};
