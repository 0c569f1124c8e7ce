//! Wallet subsystem.
//!
//! # Data Flow
//! ```text
//! WalletProvider (external signer, or LocalWallet from env key)
//!     → session.rs (connect + account → WalletSession)
//!     → provider.sign_and_submit_transaction (used by the dispatcher)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod local;
pub mod provider;
pub mod session;

pub use local::LocalWallet;
pub use provider::{AccountInfo, ProviderError, WalletProvider};
pub use session::WalletSession;
