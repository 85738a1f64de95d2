// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! # neatkit Configuration System
//!
//! Loader for the flat `name=value` experiment parameter files consumed by the
//! evolutionary engine, with:
//! - Value type inference (bool / float / int)
//! - Per-parameter "explicitly set" tracking
//! - Environment variable overrides
//! - CLI argument overrides
//! - A completeness check that refuses to hand out a half-filled configuration
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neatkit_config::load_config;
//! use std::path::Path;
//!
//! let params = load_config(Some(Path::new("params.txt")), None).expect("Failed to load params");
//! println!("Population size: {:?}", params.get_int("PopulationSize"));
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod store;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_with, parse_config_str, CONFIG_FILE_NAME, CONFIG_PATH_ENV, PARAM_ENV_PREFIX,
};
pub use store::ConfigStore;
pub use types::{ParameterValue, REQUIRED_PARAMETERS};
pub use validation::{validate_parameters, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown parameter '{0}' (not in the required parameter list)")]
    UnknownParameter(String),

    #[error("Incomplete configuration, {} parameter(s) never assigned: {}", .missing.len(), .missing.join(", "))]
    IncompleteConfiguration { missing: Vec<String> },

    #[error("Invalid value '{raw}' for parameter {name}: {reason}")]
    InvalidValue {
        name: String,
        raw: String,
        reason: String,
    },

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_error_lists_all_names() {
        let err = ConfigError::IncompleteConfiguration {
            missing: vec!["MinSpecies".to_string(), "MaxSpecies".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 parameter(s)"));
        assert!(msg.contains("MinSpecies, MaxSpecies"));
    }
}
