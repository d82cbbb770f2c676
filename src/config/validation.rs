//! Configuration validation.
//!
//! Catches values that deserialize fine but would break the server at
//! startup or on the first connection.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain whitespace, got '{0}'")]
    InvalidServerName(String),
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }

    let limits = &config.limits;
    for (key, value) in [
        ("max_line_len", limits.max_line_len),
        ("sendq", limits.sendq),
        ("event_queue", limits.event_queue),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(key));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
