//! Entry function requests for the course reward module.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ModuleConfig;
use crate::ledger::address::CanonicalAddress;
use crate::ledger::types::EntryFunctionPayload;

/// A single entry function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryArgument {
    U64(u64),
    Address(CanonicalAddress),
}

impl EntryArgument {
    /// JSON encoding expected by the REST API: u64 as a decimal string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            EntryArgument::U64(value) => serde_json::Value::String(value.to_string()),
            EntryArgument::Address(address) => serde_json::Value::String(address.to_string()),
        }
    }
}

/// A call to one module entry function. Built fresh for every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub module_address: CanonicalAddress,
    pub module_name: String,
    pub function_name: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<EntryArgument>,
}

impl TransactionRequest {
    /// Fully qualified `address::module::function`.
    pub fn function_id(&self) -> String {
        format!(
            "{}::{}::{}",
            self.module_address, self.module_name, self.function_name
        )
    }

    /// Convert into the REST payload the wallet signs.
    pub fn to_payload(&self) -> EntryFunctionPayload {
        EntryFunctionPayload {
            kind: "entry_function_payload".to_string(),
            function: self.function_id(),
            type_arguments: self.type_arguments.clone(),
            arguments: self.arguments.iter().map(EntryArgument::to_json).collect(),
        }
    }
}

impl fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function_id())
    }
}

/// The ledger module exposing the course reward entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardModule {
    address: CanonicalAddress,
    name: String,
}

impl RewardModule {
    pub fn new(address: CanonicalAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }

    pub fn from_config(config: &ModuleConfig) -> Self {
        Self::new(CanonicalAddress::new(&config.address), config.name.clone())
    }

    pub fn address(&self) -> &CanonicalAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, function_name: &str, arguments: Vec<EntryArgument>) -> TransactionRequest {
        TransactionRequest {
            module_address: self.address.clone(),
            module_name: self.name.clone(),
            function_name: function_name.to_string(),
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// `create_course(completion_reward: u64)`
    pub fn create_course(&self, completion_reward: u64) -> TransactionRequest {
        self.call("create_course", vec![EntryArgument::U64(completion_reward)])
    }

    /// `enroll(student_address: address)`
    pub fn enroll(&self, student: &CanonicalAddress) -> TransactionRequest {
        self.call("enroll", vec![EntryArgument::Address(student.clone())])
    }

    /// `request_course_completion_reward(course_creator_address: address)`
    pub fn request_course_completion_reward(&self, creator: &CanonicalAddress) -> TransactionRequest {
        self.call(
            "request_course_completion_reward",
            vec![EntryArgument::Address(creator.clone())],
        )
    }

    /// `approve_and_transfer_reward(student_address: address)`
    pub fn approve_and_transfer_reward(&self, student: &CanonicalAddress) -> TransactionRequest {
        self.call(
            "approve_and_transfer_reward",
            vec![EntryArgument::Address(student.clone())],
        )
    }
}
