//! Course workflow subsystem.
//!
//! # Data Flow
//! ```text
//! presentation layer
//!     → controller.rs (precondition checks)
//!     → transaction dispatcher (sign, submit, await finality)
//!     → state.rs (updated only after finality)
//!     → status.rs (report pushed back to the presentation layer)
//! ```
//!
//! # Design Decisions
//! - One operation at a time: operations take `&mut self`
//! - Errors never escape as panics; each one becomes a status report
//! - Workflow stages are advisory only

pub mod controller;
pub mod error;
pub mod state;
pub mod status;

pub use controller::CourseWorkflowController;
pub use error::WorkflowError;
pub use state::{CourseWorkflowState, WorkflowStage};
pub use status::{Operation, StatusPhase, StatusReport, StatusReporter};
