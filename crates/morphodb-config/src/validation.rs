// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that configured values are usable before anything is opened.

use crate::{ConfigError, ConfigResult, MorphoDbConfig, LOG_LEVELS};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - A non-empty database path
/// - A classification file given as a bare file name
/// - A morphology extension without a leading dot or path separators
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &MorphoDbConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every validation problem in `config`
pub fn collect_errors(config: &MorphoDbConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_database(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn validate_database(config: &MorphoDbConfig, errors: &mut Vec<ConfigValidationError>) {
    let database = &config.database;

    if database.path.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "database.path".to_string(),
        });
    }

    if let Some(file) = &database.classification_file {
        if file.is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "database.classification_file".to_string(),
            });
        } else if has_separator(file) {
            errors.push(ConfigValidationError::InvalidValue {
                field: "database.classification_file".to_string(),
                reason: format!("'{}' must be a file name inside database.path", file),
            });
        }
    }

    if let Some(extension) = &database.morphology_extension {
        if extension.is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "database.morphology_extension".to_string(),
            });
        } else if extension.starts_with('.') || has_separator(extension) {
            errors.push(ConfigValidationError::InvalidValue {
                field: "database.morphology_extension".to_string(),
                reason: format!("'{}' must be a bare extension such as \"h5\"", extension),
            });
        }
    }
}

fn validate_logging(config: &MorphoDbConfig, errors: &mut Vec<ConfigValidationError>) {
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}
