//! Status reporting surface for the presentation layer.
//!
//! The latest human-readable message is kept on a `watch` channel. Every
//! report is also published on a `broadcast` channel for callers that want
//! the full sequence.

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::workflow::error::WorkflowError;

/// The five workflow operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    Connect,
    CreateCourse,
    Enroll,
    RequestReward,
    ApproveReward,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::CreateCourse => "create_course",
            Operation::Enroll => "enroll",
            Operation::RequestReward => "request_reward",
            Operation::ApproveReward => "approve_reward",
        }
    }

    fn started_message(&self) -> &'static str {
        match self {
            Operation::Connect => "Connecting wallet...",
            Operation::CreateCourse => "Creating course...",
            Operation::Enroll => "Enrolling in course...",
            Operation::RequestReward => "Requesting reward...",
            Operation::ApproveReward => "Approving reward transfer...",
        }
    }

    fn success_message(&self, detail: &str) -> String {
        match self {
            Operation::Connect => format!("Connected: {}", detail),
            Operation::CreateCourse => format!("Course created successfully! TX: {}", detail),
            Operation::Enroll => format!("Enrolled successfully! TX: {}", detail),
            Operation::RequestReward => format!("Reward request submitted! TX: {}", detail),
            Operation::ApproveReward => format!("Reward approved and sent! TX: {}", detail),
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::Connect => "Error connecting wallet",
            Operation::CreateCourse => "Error creating course",
            Operation::Enroll => "Error enrolling in course",
            Operation::RequestReward => "Error requesting reward",
            Operation::ApproveReward => "Error approving reward",
        }
    }
}

/// Where an operation attempt stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPhase {
    Started,
    Succeeded { tx_hash: Option<String> },
    Failed { error: WorkflowError },
}

/// One status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub operation_id: Uuid,
    pub operation: Operation,
    pub phase: StatusPhase,
    pub message: String,
}

impl StatusReport {
    pub fn tx_hash(&self) -> Option<&str> {
        match &self.phase {
            StatusPhase::Succeeded { tx_hash } => tx_hash.as_deref(),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.phase, StatusPhase::Failed { .. })
    }
}

/// Publishes status reports.
#[derive(Debug)]
pub struct StatusReporter {
    message_tx: watch::Sender<String>,
    events_tx: broadcast::Sender<StatusReport>,
}

impl StatusReporter {
    /// `capacity` bounds how many reports a slow subscriber may lag behind.
    pub fn new(capacity: usize) -> Self {
        let (message_tx, _) = watch::channel(String::new());
        let (events_tx, _) = broadcast::channel(capacity);
        Self {
            message_tx,
            events_tx,
        }
    }

    /// Subscribe to every report from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusReport> {
        self.events_tx.subscribe()
    }

    /// Watch the latest status message.
    pub fn watch_message(&self) -> watch::Receiver<String> {
        self.message_tx.subscribe()
    }

    pub fn current_message(&self) -> String {
        self.message_tx.borrow().clone()
    }

    pub fn started(&self, operation_id: Uuid, operation: Operation) {
        self.publish(StatusReport {
            operation_id,
            operation,
            phase: StatusPhase::Started,
            message: operation.started_message().to_string(),
        });
    }

    /// `detail` is the transaction hash, or the address for `Connect`.
    pub fn succeeded(&self, operation_id: Uuid, operation: Operation, detail: &str) {
        let tx_hash = match operation {
            Operation::Connect => None,
            _ => Some(detail.to_string()),
        };
        self.publish(StatusReport {
            operation_id,
            operation,
            phase: StatusPhase::Succeeded { tx_hash },
            message: operation.success_message(detail),
        });
    }

    pub fn failed(&self, operation_id: Uuid, operation: Operation, error: &WorkflowError) {
        let message = if error.is_precondition() {
            error.to_string()
        } else {
            format!("{}: {}", operation.failure_prefix(), error)
        };
        self.publish(StatusReport {
            operation_id,
            operation,
            phase: StatusPhase::Failed {
                error: error.clone(),
            },
            message,
        });
    }

    fn publish(&self, report: StatusReport) {
        tracing::debug!(
            operation = report.operation.name(),
            operation_id = %report.operation_id,
            message = %report.message,
            "Status"
        );
        self.message_tx.send_replace(report.message.clone());
        // No subscribers is fine.
        let _ = self.events_tx.send(report);
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let reporter = StatusReporter::default();
        let mut events = reporter.subscribe();
        let id = Uuid::new_v4();

        reporter.started(id, Operation::CreateCourse);
        assert_eq!(reporter.current_message(), "Creating course...");

        reporter.succeeded(id, Operation::CreateCourse, "0xfeed");
        assert_eq!(reporter.current_message(), "Course created successfully! TX: 0xfeed");

        assert_eq!(events.try_recv().unwrap().phase, StatusPhase::Started);
        let report = events.try_recv().unwrap();
        assert_eq!(report.tx_hash(), Some("0xfeed"));
        assert_eq!(report.operation_id, id);
    }

    #[test]
    fn test_connect_success_has_no_hash() {
        let reporter = StatusReporter::default();
        let mut events = reporter.subscribe();
        reporter.succeeded(Uuid::new_v4(), Operation::Connect, "0xabc");
        let report = events.try_recv().unwrap();
        assert_eq!(report.message, "Connected: 0xabc");
        assert_eq!(report.tx_hash(), None);
    }

    #[test]
    fn test_failure_messages() {
        let reporter = StatusReporter::default();
        reporter.failed(Uuid::new_v4(), Operation::Enroll, &WorkflowError::NotConnected);
        assert_eq!(reporter.current_message(), "Please connect your wallet first");

        reporter.failed(
            Uuid::new_v4(),
            Operation::ApproveReward,
            &WorkflowError::SubmissionRejected("declined".to_string()),
        );
        assert_eq!(
            reporter.current_message(),
            "Error approving reward: Submission rejected: declined"
        );
    }

    #[test]
    fn test_publish_without_subscribers() {
        let reporter = StatusReporter::default();
        reporter.started(Uuid::new_v4(), Operation::Connect);
        assert_eq!(reporter.current_message(), "Connecting wallet...");
    }
}
