//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the controller.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the course rewards controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    /// Fullnode endpoint and chain settings.
    pub network: NetworkConfig,

    /// Ledger module the workflow talks to.
    pub module: ModuleConfig,

    /// Finality polling settings.
    pub finality: FinalityConfig,

    /// Gas limits applied by the local key wallet.
    pub gas: GasConfig,

    /// Workflow defaults and address policy.
    pub workflow: WorkflowConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Fullnode connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// REST endpoint of the fullnode (without the `/v1` suffix).
    pub node_url: String,

    /// Expected chain ID. Not verified when unset.
    pub chain_id: Option<u8>,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_url: "https://fullnode.devnet.aptoslabs.com".to_string(),
            chain_id: None,
            request_timeout_secs: 10,
        }
    }
}

/// Address and name of the course reward module.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Account the module is published under.
    pub address: String,

    /// Module name.
    pub name: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            address: "0xc8a52a71eb01c6b890bd0c7043a423d1e0beeffb41add865dc296ff0008c8982"
                .to_string(),
            name: "Reward".to_string(),
        }
    }
}

/// Settings for awaiting transaction finality.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FinalityConfig {
    /// Maximum time to wait for a transaction to commit, in seconds.
    pub timeout_secs: u64,

    /// Interval between status polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for FinalityConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            poll_interval_ms: 1000,
        }
    }
}

/// Gas settings for locally signed transactions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Maximum gas units a transaction may consume.
    pub max_gas_amount: u64,

    /// Refuse to submit when the estimated unit price exceeds this (octas).
    pub max_gas_unit_price: u64,

    /// Seconds until a submitted transaction expires.
    pub expiration_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 10_000,
            max_gas_unit_price: 1_000,
            expiration_secs: 60,
        }
    }
}

/// Workflow defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Completion reward offered when none is given explicitly.
    pub default_completion_reward: u64,

    /// Reject student addresses that are not 1-64 hex digits.
    pub strict_addresses: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_completion_reward: 100,
            strict_addresses: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG` when set.
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "course_rewards=info".to_string(),
            json: false,
        }
    }
}
