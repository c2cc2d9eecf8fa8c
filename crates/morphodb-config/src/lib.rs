// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! # morphodb Configuration System
//!
//! Type-safe configuration loader for morphodb with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use morphodb_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! println!("Morphology database: {}", config.database.path.display());
//! ```
//!
//! ## File layout
//!
//! ```toml
//! [database]
//! path = "/data/morphologies"
//! classification_file = "neurondb.dat"
//! morphology_extension = "json"
//!
//! [logging]
//! level = "info"
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
