//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → spans per workflow operation carrying an operation_id
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//! ```
//!
//! The user-facing status message lives in `workflow::status`, not here.

pub mod logging;
