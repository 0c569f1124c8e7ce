//! Course workflow orchestration.
//!
//! Every operation follows the same shape: validate preconditions, hand a
//! request to the dispatcher, update [`CourseWorkflowState`] once the
//! transaction is final, then report. A failed precondition is reported
//! without any provider or RPC call. A failed transaction leaves the state
//! exactly as it was.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::Span;
use uuid::Uuid;

use crate::config::ControllerConfig;
use crate::ledger::address::{canonicalize, CanonicalAddress};
use crate::ledger::client::LedgerRpc;
use crate::transaction::dispatcher::{TransactionDispatcher, TransactionOutcome};
use crate::transaction::request::{RewardModule, TransactionRequest};
use crate::wallet::provider::WalletProvider;
use crate::wallet::session::WalletSession;
use crate::workflow::error::WorkflowError;
use crate::workflow::state::CourseWorkflowState;
use crate::workflow::status::{Operation, StatusReport, StatusReporter};

/// Drives the course reward workflow for a single wallet session.
pub struct CourseWorkflowController {
    provider: Option<Arc<dyn WalletProvider>>,
    dispatcher: TransactionDispatcher,
    module: RewardModule,
    session: WalletSession,
    state: CourseWorkflowState,
    status: StatusReporter,
    strict_addresses: bool,
}

impl CourseWorkflowController {
    /// Create a controller. `provider` is `None` when the host has no wallet.
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        rpc: Arc<dyn LedgerRpc>,
        module: RewardModule,
    ) -> Self {
        Self {
            provider,
            dispatcher: TransactionDispatcher::new(rpc),
            module,
            session: WalletSession::disconnected(),
            state: CourseWorkflowState::default(),
            status: StatusReporter::default(),
            strict_addresses: false,
        }
    }

    /// Create a controller with module, defaults and address policy from `config`.
    pub fn from_config(
        provider: Option<Arc<dyn WalletProvider>>,
        rpc: Arc<dyn LedgerRpc>,
        config: &ControllerConfig,
    ) -> Self {
        let mut controller = Self::new(provider, rpc, RewardModule::from_config(&config.module));
        controller.state = CourseWorkflowState::new(config.workflow.default_completion_reward);
        controller.strict_addresses = config.workflow.strict_addresses;
        controller
    }

    /// Reject student addresses that are not 1-64 hex digits.
    pub fn with_strict_addresses(mut self, strict: bool) -> Self {
        self.strict_addresses = strict;
        self
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn state(&self) -> &CourseWorkflowState {
        &self.state
    }

    pub fn module(&self) -> &RewardModule {
        &self.module
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    /// Subscribe to status reports.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusReport> {
        self.status.subscribe()
    }

    /// Connect the wallet, replacing any existing session.
    ///
    /// A failed connect keeps the previous session.
    #[tracing::instrument(skip_all, fields(operation = "connect", operation_id = tracing::field::Empty))]
    pub async fn connect(&mut self) -> Result<CanonicalAddress, WorkflowError> {
        let (op, id) = begin(Operation::Connect);
        self.status.started(id, op);

        match WalletSession::connect(self.provider.clone()).await {
            Ok(session) => {
                self.session = session;
                let address = self.connected_address()?;
                self.status.succeeded(id, op, address.as_str());
                Ok(address)
            }
            Err(e) => self.reject(id, op, e),
        }
    }

    /// Create a course offering `completion_reward`.
    #[tracing::instrument(skip_all, fields(operation = "create_course", operation_id = tracing::field::Empty))]
    pub async fn create_course(
        &mut self,
        completion_reward: u64,
    ) -> Result<TransactionOutcome, WorkflowError> {
        let (op, id) = begin(Operation::CreateCourse);
        let creator = match self.connected_address() {
            Ok(address) => address,
            Err(e) => return self.reject(id, op, e),
        };

        let outcome = self
            .dispatch(id, op, self.module.create_course(completion_reward))
            .await?;

        self.state.record_course_created(creator, completion_reward);
        self.status.succeeded(id, op, &outcome.hash);
        Ok(outcome)
    }

    /// Enroll the connected account.
    #[tracing::instrument(skip_all, fields(operation = "enroll", operation_id = tracing::field::Empty))]
    pub async fn enroll(&mut self) -> Result<TransactionOutcome, WorkflowError> {
        let (op, id) = begin(Operation::Enroll);
        let student = match self.connected_address() {
            Ok(address) => address,
            Err(e) => return self.reject(id, op, e),
        };

        let outcome = self.dispatch(id, op, self.module.enroll(&student)).await?;

        self.state.record_enrolled();
        self.status.succeeded(id, op, &outcome.hash);
        Ok(outcome)
    }

    /// Request the completion reward from the course creator.
    #[tracing::instrument(skip_all, fields(operation = "request_reward", operation_id = tracing::field::Empty))]
    pub async fn request_reward(&mut self) -> Result<TransactionOutcome, WorkflowError> {
        let (op, id) = begin(Operation::RequestReward);
        if let Err(e) = self.connected_address() {
            return self.reject(id, op, e);
        }
        let Some(creator) = self.state.course_creator_address.clone() else {
            return self.reject(
                id,
                op,
                WorkflowError::PreconditionFailed(
                    "Invalid course creator address: no course has been created".to_string(),
                ),
            );
        };

        let outcome = self
            .dispatch(id, op, self.module.request_course_completion_reward(&creator))
            .await?;

        self.state.record_reward_requested();
        self.status.succeeded(id, op, &outcome.hash);
        Ok(outcome)
    }

    /// Approve and transfer the reward to `student_address`.
    ///
    /// Any connected session may approve for any student; the ledger module
    /// decides whether that is allowed.
    #[tracing::instrument(skip_all, fields(operation = "approve_reward", operation_id = tracing::field::Empty))]
    pub async fn approve_reward(
        &mut self,
        student_address: &str,
    ) -> Result<TransactionOutcome, WorkflowError> {
        let (op, id) = begin(Operation::ApproveReward);
        if let Err(e) = self.connected_address() {
            return self.reject(id, op, e);
        }
        let student = match self.check_student(student_address) {
            Ok(student) => student,
            Err(e) => return self.reject(id, op, e),
        };

        let outcome = self
            .dispatch(id, op, self.module.approve_and_transfer_reward(&student))
            .await?;

        self.state.record_reward_approved();
        self.status.succeeded(id, op, &outcome.hash);
        Ok(outcome)
    }

    fn connected_address(&self) -> Result<CanonicalAddress, WorkflowError> {
        self.session
            .address()
            .cloned()
            .ok_or(WorkflowError::NotConnected)
    }

    fn check_student(&self, raw: &str) -> Result<CanonicalAddress, WorkflowError> {
        let student = canonicalize(raw);
        if !student.is_well_formed() {
            return Err(WorkflowError::PreconditionFailed(
                "Invalid student address: address is empty".to_string(),
            ));
        }
        if self.strict_addresses {
            student.validate_strict().map_err(|reason| {
                WorkflowError::PreconditionFailed(format!("Invalid student address: {}", reason))
            })?;
        }
        Ok(student)
    }

    async fn dispatch(
        &self,
        id: Uuid,
        op: Operation,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, WorkflowError> {
        self.status.started(id, op);
        tracing::info!(function = %request, "Submitting transaction");

        match self.dispatcher.submit(&self.session, request).await {
            Ok(outcome) => {
                tracing::info!(tx_hash = %outcome.hash, "Transaction finalized");
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Transaction failed");
                self.status.failed(id, op, &e);
                Err(e)
            }
        }
    }

    fn reject<T>(&self, id: Uuid, op: Operation, error: WorkflowError) -> Result<T, WorkflowError> {
        tracing::info!(error = %error, kind = error.kind(), "Operation rejected before submission");
        self.status.failed(id, op, &error);
        Err(error)
    }
}

impl std::fmt::Debug for CourseWorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseWorkflowController")
            .field("module", &self.module)
            .field("session", &self.session)
            .field("state", &self.state)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

/// Allocate an operation ID and attach it to the current span.
fn begin(op: Operation) -> (Operation, Uuid) {
    let id = Uuid::new_v4();
    Span::current().record("operation_id", tracing::field::display(id));
    (op, id)
}
