//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limits > 0)
//! - Check the node URL and module identifiers are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ControllerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ControllerConfig;
use crate::ledger::address::CanonicalAddress;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &ControllerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.network.node_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "network.node_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "network.node_url",
            format!("invalid URL '{}': {}", config.network.node_url, e),
        )),
    }

    if config.network.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if let Err(reason) = CanonicalAddress::new(&config.module.address).validate_strict() {
        errors.push(ValidationError::new("module.address", reason));
    }

    if !is_identifier(&config.module.name) {
        errors.push(ValidationError::new(
            "module.name",
            format!("'{}' is not a valid module identifier", config.module.name),
        ));
    }

    if config.finality.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "finality.timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.finality.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "finality.poll_interval_ms",
            "must be greater than zero",
        ));
    }

    if config.gas.max_gas_amount == 0 {
        errors.push(ValidationError::new("gas.max_gas_amount", "must be greater than zero"));
    }

    if config.gas.expiration_secs == 0 {
        errors.push(ValidationError::new("gas.expiration_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Move identifiers: ASCII letter or underscore, then alphanumerics/underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
