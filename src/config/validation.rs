//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value shapes the rest of the crate assumes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: `AppConfig → Result<(), Vec<ValidationError>>`

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One semantic problem found in a configuration.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

/// Check the invariants route registration relies on.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // app_root is concatenated in front of paths that start with '/'
    if !config.app_root.is_empty() {
        if !config.app_root.starts_with('/') {
            errors.push(ValidationError {
                field: "app_root",
                message: format!("`{}` must start with a slash", config.app_root),
            });
        }
        if config.app_root.ends_with('/') {
            errors.push(ValidationError {
                field: "app_root",
                message: format!("`{}` must not end with a slash", config.app_root),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ValidationError {
            field: "log.level",
            message: format!(
                "`{}` is not one of trace, debug, info, warn, error",
                config.log.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
