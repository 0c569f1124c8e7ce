//! Workflow-local state.
//!
//! Only the controller mutates this, and only after a transaction is final.

use serde::{Deserialize, Serialize};

use crate::ledger::address::CanonicalAddress;

/// Advisory progress marker. Not used as a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkflowStage {
    #[default]
    NoCourse,
    CourseCreated,
    Enrolled,
    RewardRequested,
    RewardApproved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWorkflowState {
    /// Set by a finalized `create_course`.
    pub course_creator_address: Option<CanonicalAddress>,
    pub completion_reward: u64,
    /// Successful local enrollments; not read from the ledger.
    pub enrolled_count: u64,
    pub is_enrolled: bool,
    pub stage: WorkflowStage,
}

impl CourseWorkflowState {
    pub fn new(completion_reward: u64) -> Self {
        Self {
            course_creator_address: None,
            completion_reward,
            enrolled_count: 0,
            is_enrolled: false,
            stage: WorkflowStage::NoCourse,
        }
    }

    pub(crate) fn record_course_created(&mut self, creator: CanonicalAddress, completion_reward: u64) {
        self.course_creator_address = Some(creator);
        self.completion_reward = completion_reward;
        self.stage = WorkflowStage::CourseCreated;
    }

    pub(crate) fn record_enrolled(&mut self) {
        self.is_enrolled = true;
        self.enrolled_count += 1;
        self.stage = WorkflowStage::Enrolled;
    }

    pub(crate) fn record_reward_requested(&mut self) {
        self.stage = WorkflowStage::RewardRequested;
    }

    pub(crate) fn record_reward_approved(&mut self) {
        self.stage = WorkflowStage::RewardApproved;
    }
}

impl Default for CourseWorkflowState {
    fn default() -> Self {
        Self::new(0)
    }
}
